//! Per-bin diagnostic records of a polarized evaluation.

use std::{
    fmt,
    io::{self, Write},
};

/// One line of the diagnostic dump.
///
/// Flux and Stokes parameters are densities, divided by the bin width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagnosticRecord {
    pub energy: f64,
    pub flux: f64,
    pub q: f64,
    pub u: f64,
    pub v: f64,
    pub degree: f64,
    pub psi: f64,
    pub beta: f64,
}

impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            self.energy,
            self.flux,
            self.q,
            self.u,
            self.v,
            self.degree,
            self.psi,
            self.beta,
        ];

        for (index, field) in fields.into_iter().enumerate() {
            if index > 0 {
                f.write_str("\t")?;
            }
            f.write_str(&scientific(field))?;
        }

        Ok(())
    }
}

/// Writes one tab separated line per record.
pub fn write_records<W: Write>(writer: &mut W, records: &[DiagnosticRecord]) -> io::Result<()> {
    for record in records {
        writeln!(writer, "{record}")?;
    }
    writer.flush()
}

/// Formats `value` with six mantissa digits and a signed exponent of at least
/// two digits, e.g. `1.500000E+00`.
fn scientific(value: f64) -> String {
    let formatted = format!("{value:.6E}");
    if let Some((mantissa, exponent)) = formatted.split_once('E')
        && let Ok(exponent) = exponent.parse::<i32>()
    {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}E{sign}{:02}", exponent.abs());
    }

    // inf and NaN have no exponent.
    formatted
}
