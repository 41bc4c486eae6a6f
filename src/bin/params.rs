use stokes_disc::params::ModelParams;

fn main() -> serde_json::Result<()> {
    let params = ModelParams::default();
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}
