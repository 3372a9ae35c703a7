//! Touchstone file writer
//!
//! Writes Touchstone v1 files. Two-port data uses the S11 S21 S12 S22 column
//! order; larger networks write one matrix row per line, four pairs per line.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::parser::{Touchstone, TouchstoneError};

const PAIRS_PER_LINE: usize = 4;

impl fmt::Display for Touchstone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write_to(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

impl Touchstone {
    /// Write to a Touchstone file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), TouchstoneError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), TouchstoneError> {
        for comment in &self.comments {
            writeln!(writer, "! {}", comment)?;
        }

        writeln!(
            writer,
            "# {} {} {} R {}",
            self.frequency.unit().touchstone_label(),
            self.param_type.label(),
            self.format.label(),
            self.z0.first().copied().unwrap_or(50.0)
        )?;

        let n = self.nports;
        for (f_idx, freq) in self.frequency.f_scaled().iter().enumerate() {
            write!(writer, "{:>15.9}", freq)?;

            if n <= 2 {
                let order: &[(usize, usize)] = if n == 2 {
                    &[(0, 0), (1, 0), (0, 1), (1, 1)]
                } else {
                    &[(0, 0)]
                };
                for &(i, j) in order {
                    let (v1, v2) = self.format.encode(self.params[[f_idx, i, j]]);
                    write!(writer, " {:>15.9} {:>15.9}", v1, v2)?;
                }
                writeln!(writer)?;
                continue;
            }

            for i in 0..n {
                for j in 0..n {
                    if j > 0 && j % PAIRS_PER_LINE == 0 {
                        writeln!(writer)?;
                        write!(writer, "{:>15}", "")?;
                    }
                    let (v1, v2) = self.format.encode(self.params[[f_idx, i, j]]);
                    write!(writer, " {:>15.9} {:>15.9}", v1, v2)?;
                }
                writeln!(writer)?;
                if i + 1 < n {
                    write!(writer, "{:>15}", "")?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::parser::{ParameterType, SParamFormat};
    use super::*;
    use crate::frequency::{Frequency, FrequencyUnit, SweepType};
    use approx::assert_relative_eq;
    use ndarray::Array3;
    use num_complex::Complex64;

    fn touchstone(nports: usize, format: SParamFormat) -> Touchstone {
        let frequency = Frequency::new(1.0, 2.0, 2, FrequencyUnit::GHz, SweepType::Linear);
        let params = Array3::from_shape_fn((2, nports, nports), |(f, i, j)| {
            Complex64::new(0.1 * (i * nports + j + 1) as f64, 0.01 * f as f64)
        });
        Touchstone {
            nports,
            frequency,
            params,
            z0: vec![50.0; nports],
            comments: vec!["written by a test".to_string()],
            format,
            param_type: ParameterType::S,
            is_v2: false,
        }
    }

    #[test]
    fn test_option_line_and_comments() {
        let text = touchstone(2, SParamFormat::DB).to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("! written by a test"));
        assert_eq!(lines.next(), Some("# GHZ S DB R 50"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_written_five_port_reads_back() {
        let ts = touchstone(5, SParamFormat::MA);
        let back = Touchstone::from_str(&ts.to_string(), 5).unwrap();

        assert_eq!(back.nfreq(), 2);
        for (a, b) in ts.params.iter().zip(back.params.iter()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-8);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-8);
        }
    }
}
