//! Touchstone file parser
//!
//! Implements parsing of Touchstone v1 (`.sNp`) and v2 (`.ts`) files.
//! Records may span several lines; noise data is skipped.

use ndarray::Array3;
use num_complex::Complex64;
use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

use crate::frequency::{Frequency, FrequencyUnit};

/// Touchstone parsing errors
#[derive(Error, Debug)]
pub enum TouchstoneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid option line: {0}")]
    InvalidOption(String),

    #[error("Invalid file extension: expected .sNp or .ts format")]
    InvalidExtension,
}

/// Complex number format of the data section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SParamFormat {
    /// Real-Imaginary
    #[default]
    RI,
    /// Magnitude-Angle (degrees)
    MA,
    /// dB-Angle (degrees)
    DB,
}

impl SParamFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "RI" => Some(SParamFormat::RI),
            "MA" => Some(SParamFormat::MA),
            "DB" => Some(SParamFormat::DB),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SParamFormat::RI => "RI",
            SParamFormat::MA => "MA",
            SParamFormat::DB => "DB",
        }
    }

    /// Decode one value pair into a complex number
    pub fn decode(&self, v1: f64, v2: f64) -> Complex64 {
        match self {
            SParamFormat::RI => Complex64::new(v1, v2),
            SParamFormat::MA => Complex64::from_polar(v1, v2 * PI / 180.0),
            SParamFormat::DB => Complex64::from_polar(10.0_f64.powf(v1 / 20.0), v2 * PI / 180.0),
        }
    }

    /// Encode a complex number as a value pair
    pub fn encode(&self, c: Complex64) -> (f64, f64) {
        match self {
            SParamFormat::RI => (c.re, c.im),
            SParamFormat::MA => (c.norm(), c.arg() * 180.0 / PI),
            SParamFormat::DB => (20.0 * c.norm().log10(), c.arg() * 180.0 / PI),
        }
    }
}

/// Network parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterType {
    #[default]
    S,
    Y,
    Z,
    G,
    H,
}

impl ParameterType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "S" => Some(ParameterType::S),
            "Y" => Some(ParameterType::Y),
            "Z" => Some(ParameterType::Z),
            "G" => Some(ParameterType::G),
            "H" => Some(ParameterType::H),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParameterType::S => "S",
            ParameterType::Y => "Y",
            ParameterType::Z => "Z",
            ParameterType::G => "G",
            ParameterType::H => "H",
        }
    }
}

/// Layout of each matrix in the data section (v2 only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixFormat {
    #[default]
    Full,
    Lower,
    Upper,
}

/// Touchstone file contents
#[derive(Debug, Clone)]
pub struct Touchstone {
    /// Number of ports
    pub nports: usize,
    /// Frequency points
    pub frequency: Frequency,
    /// Parameter data [nfreq, nports, nports], of kind `param_type`
    pub params: Array3<Complex64>,
    /// Reference impedance (per port)
    pub z0: Vec<f64>,
    /// Comments from the file
    pub comments: Vec<String>,
    /// Original format
    pub format: SParamFormat,
    pub param_type: ParameterType,
    /// Is this a Version 2.0 file?
    pub is_v2: bool,
}

impl Touchstone {
    /// Parse a Touchstone file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TouchstoneError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or(TouchstoneError::InvalidExtension)?;
        let nports = Self::parse_extension(ext)?;

        let reader = BufReader::new(File::open(path)?);
        Self::parse(reader, nports)
    }

    /// Number of ports implied by an extension; 0 for `.ts`, where the file says
    pub fn parse_extension(ext: &str) -> Result<usize, TouchstoneError> {
        let ext = ext.to_lowercase();
        if ext == "ts" {
            return Ok(0);
        }
        ext.strip_prefix('s')
            .and_then(|rest| rest.strip_suffix('p'))
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .ok_or(TouchstoneError::InvalidExtension)
    }

    /// Parse from string content
    ///
    /// Useful where there is no file system, or for data embedded in the binary.
    ///
    /// # Arguments
    /// * `content` - Touchstone file content
    /// * `nports` - Number of ports (from the extension; 0 lets a v2 file say)
    ///
    /// # Example
    /// ```
    /// use skrf_core::touchstone::Touchstone;
    /// let content = "# GHz S RI R 50\n1.0 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0";
    /// let ts = Touchstone::from_str(content, 2).unwrap();
    /// assert_eq!(ts.nfreq(), 1);
    /// ```
    pub fn from_str(content: &str, nports: usize) -> Result<Self, TouchstoneError> {
        Self::parse(std::io::Cursor::new(content), nports)
    }

    fn parse<R: BufRead>(reader: R, nports: usize) -> Result<Self, TouchstoneError> {
        let mut state = ParserState::new(nports);

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if state.step(idx + 1, line.trim())? == Flow::Stop {
                break;
            }
        }

        state.finish()
    }

    /// Parse the option line (`# GHz S RI R 50`)
    pub fn parse_option_line(
        line: &str,
    ) -> Result<(FrequencyUnit, SParamFormat, f64, ParameterType), TouchstoneError> {
        let body = line
            .strip_prefix('#')
            .ok_or_else(|| TouchstoneError::InvalidOption(line.to_string()))?;

        let mut unit = FrequencyUnit::GHz;
        let mut format = SParamFormat::MA;
        let mut z0 = 50.0;
        let mut param_type = ParameterType::S;

        let mut parts = body.split_whitespace();
        while let Some(part) = parts.next() {
            if let Ok(u) = part.parse::<FrequencyUnit>() {
                unit = u;
            } else if let Some(fmt) = SParamFormat::from_str(part) {
                format = fmt;
            } else if let Some(pt) = ParameterType::from_str(part) {
                param_type = pt;
            } else if part.eq_ignore_ascii_case("R") {
                z0 = parts
                    .next()
                    .and_then(|r| r.parse::<f64>().ok())
                    .ok_or_else(|| TouchstoneError::InvalidOption(line.to_string()))?;
            } else {
                return Err(TouchstoneError::InvalidOption(line.to_string()));
            }
        }

        Ok((unit, format, z0, param_type))
    }

    /// Get the number of frequency points
    #[inline]
    pub fn nfreq(&self) -> usize {
        self.params.shape()[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

struct ParserState {
    nports: usize,
    unit: FrequencyUnit,
    format: SParamFormat,
    param_type: ParameterType,
    matrix_format: MatrixFormat,
    z0: Vec<f64>,
    comments: Vec<String>,
    option_parsed: bool,
    is_v2: bool,
    in_network_data: bool,
    reading_reference: bool,
    /// Two-port column order is S11 S21 S12 S22 (always in v1)
    order_21_12: bool,

    frequencies: Vec<f64>,
    matrices: Vec<Vec<Complex64>>,
    pending: Vec<f64>,
}

impl ParserState {
    fn new(nports: usize) -> Self {
        Self {
            nports,
            unit: FrequencyUnit::GHz,
            format: SParamFormat::MA,
            param_type: ParameterType::S,
            matrix_format: MatrixFormat::Full,
            z0: Vec::new(),
            comments: Vec::new(),
            option_parsed: false,
            is_v2: false,
            in_network_data: false,
            reading_reference: false,
            order_21_12: true,
            frequencies: Vec::new(),
            matrices: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn step(&mut self, lineno: usize, line: &str) -> Result<Flow, TouchstoneError> {
        if let Some(comment) = line.strip_prefix('!') {
            self.comments.push(comment.trim().to_string());
            return Ok(Flow::Continue);
        }

        let line = match line.find('!') {
            Some(idx) => line[..idx].trim(),
            None => line,
        };
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        if line.starts_with('#') {
            if !self.option_parsed {
                let (unit, format, z0, param_type) = Touchstone::parse_option_line(line)?;
                self.unit = unit;
                self.format = format;
                self.param_type = param_type;
                if self.z0.is_empty() {
                    self.z0 = vec![z0];
                }
                self.option_parsed = true;
            }
            return Ok(Flow::Continue);
        }

        if line.starts_with('[') {
            return self.keyword(lineno, line);
        }

        if self.reading_reference {
            self.z0.extend(parse_numbers(lineno, line)?);
            self.reading_reference = self.z0.len() < self.nports;
            return Ok(Flow::Continue);
        }

        if self.is_v2 && !self.in_network_data {
            return Ok(Flow::Continue);
        }

        self.data_line(lineno, line)
    }

    fn keyword(&mut self, lineno: usize, line: &str) -> Result<Flow, TouchstoneError> {
        let close = line.find(']').ok_or_else(|| TouchstoneError::Parse {
            line: lineno,
            message: format!("unterminated keyword: {}", line),
        })?;
        let keyword = line[1..close].trim().to_lowercase();
        let rest = line[close + 1..].trim();

        match keyword.as_str() {
            "version" => self.is_v2 = rest != "1.0",
            "number of ports" => {
                self.nports = rest.parse().map_err(|_| {
                    TouchstoneError::InvalidOption(format!("invalid port number: {}", rest))
                })?;
            }
            "two-port data order" => self.order_21_12 = rest.contains("21_12"),
            "reference" => {
                self.z0 = parse_numbers(lineno, rest)?;
                self.reading_reference = self.z0.len() < self.nports;
            }
            "matrix format" => {
                self.matrix_format = match rest.to_lowercase().as_str() {
                    "lower" => MatrixFormat::Lower,
                    "upper" => MatrixFormat::Upper,
                    _ => MatrixFormat::Full,
                };
            }
            "network data" => self.in_network_data = true,
            "noise data" | "end" => return Ok(Flow::Stop),
            // Number of Frequencies, Mixed-Mode Order, ... carry nothing we keep
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn values_per_record(&self) -> usize {
        let n = self.nports;
        let pairs = match self.matrix_format {
            MatrixFormat::Full => n * n,
            MatrixFormat::Lower | MatrixFormat::Upper => n * (n + 1) / 2,
        };
        1 + 2 * pairs
    }

    fn data_line(&mut self, lineno: usize, line: &str) -> Result<Flow, TouchstoneError> {
        if self.nports == 0 {
            return Err(TouchstoneError::InvalidOption(
                "number of ports is unknown".to_string(),
            ));
        }

        let values = parse_numbers(lineno, line)?;

        // A new record whose frequency does not increase starts the v1 noise block
        if self.pending.is_empty() {
            if let (Some(&first), Some(&last)) = (values.first(), self.frequencies.last()) {
                if first * self.unit.multiplier() <= last {
                    return Ok(Flow::Stop);
                }
            }
        }

        self.pending.extend(values);
        let record_len = self.values_per_record();
        while self.pending.len() >= record_len {
            let record: Vec<f64> = self.pending.drain(..record_len).collect();
            self.push_record(&record);
        }
        Ok(Flow::Continue)
    }

    fn push_record(&mut self, record: &[f64]) {
        let n = self.nports;
        self.frequencies.push(record[0] * self.unit.multiplier());

        let mut pairs = record[1..]
            .chunks_exact(2)
            .map(|p| self.format.decode(p[0], p[1]));
        let mut m = vec![Complex64::new(0.0, 0.0); n * n];

        match self.matrix_format {
            MatrixFormat::Full => {
                for (k, c) in pairs.by_ref().enumerate().take(n * n) {
                    let (i, j) = (k / n, k % n);
                    if n == 2 && self.order_21_12 {
                        // S11 S21 S12 S22
                        m[j * n + i] = c;
                    } else {
                        m[i * n + j] = c;
                    }
                }
            }
            MatrixFormat::Lower => {
                for i in 0..n {
                    for j in 0..=i {
                        let c = pairs.next().unwrap_or_default();
                        m[i * n + j] = c;
                        m[j * n + i] = c;
                    }
                }
            }
            MatrixFormat::Upper => {
                for i in 0..n {
                    for j in i..n {
                        let c = pairs.next().unwrap_or_default();
                        m[i * n + j] = c;
                        m[j * n + i] = c;
                    }
                }
            }
        }

        self.matrices.push(m);
    }

    fn finish(self) -> Result<Touchstone, TouchstoneError> {
        if !self.pending.is_empty() {
            return Err(TouchstoneError::Parse {
                line: 0,
                message: format!(
                    "incomplete data record: {} trailing values",
                    self.pending.len()
                ),
            });
        }
        if self.nports == 0 {
            return Err(TouchstoneError::InvalidOption(
                "number of ports is unknown".to_string(),
            ));
        }

        let n = self.nports;
        let nfreq = self.matrices.len();
        let matrices = self.matrices;
        let params = Array3::from_shape_fn((nfreq, n, n), |(f, i, j)| matrices[f][i * n + j]);

        let z0 = match self.z0.len() {
            len if len == n => self.z0,
            0 => vec![50.0; n],
            _ => vec![self.z0[0]; n],
        };

        let mult = self.unit.multiplier();
        let frequency = Frequency::from_f(
            self.frequencies.iter().map(|f| f / mult).collect(),
            self.unit,
        );

        Ok(Touchstone {
            nports: n,
            frequency,
            params,
            z0,
            comments: self.comments,
            format: self.format,
            param_type: self.param_type,
            is_v2: self.is_v2,
        })
    }
}

fn parse_numbers(lineno: usize, line: &str) -> Result<Vec<f64>, TouchstoneError> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| TouchstoneError::Parse {
                line: lineno,
                message: format!("invalid number: {}", tok),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_extension() {
        assert_eq!(Touchstone::parse_extension("s1p").unwrap(), 1);
        assert_eq!(Touchstone::parse_extension("S4P").unwrap(), 4);
        assert_eq!(Touchstone::parse_extension("s32p").unwrap(), 32);
        assert_eq!(Touchstone::parse_extension("ts").unwrap(), 0);
        assert!(Touchstone::parse_extension("s0p").is_err());
        assert!(Touchstone::parse_extension("txt").is_err());
    }

    #[test]
    fn test_parse_option_line() {
        let (unit, format, z0, param_type) =
            Touchstone::parse_option_line("# GHz S RI R 50").unwrap();
        assert_eq!(unit, FrequencyUnit::GHz);
        assert_eq!(format, SParamFormat::RI);
        assert_eq!(z0, 50.0);
        assert_eq!(param_type, ParameterType::S);

        let (unit, format, z0, _) = Touchstone::parse_option_line("# MHz Z MA R 75").unwrap();
        assert_eq!(unit, FrequencyUnit::MHz);
        assert_eq!(format, SParamFormat::MA);
        assert_eq!(z0, 75.0);

        // defaults
        let (unit, format, z0, _) = Touchstone::parse_option_line("#").unwrap();
        assert_eq!(unit, FrequencyUnit::GHz);
        assert_eq!(format, SParamFormat::MA);
        assert_eq!(z0, 50.0);

        assert!(Touchstone::parse_option_line("# GHz S RI R").is_err());
        assert!(Touchstone::parse_option_line("# GHz S XX").is_err());
    }

    #[test]
    fn test_two_port_order() {
        let content = "# GHz S RI R 50\n1.0 1 0 2 0 3 0 4 0\n";
        let ts = Touchstone::from_str(content, 2).unwrap();
        // S11 S21 S12 S22
        assert_eq!(ts.params[[0, 0, 0]].re, 1.0);
        assert_eq!(ts.params[[0, 1, 0]].re, 2.0);
        assert_eq!(ts.params[[0, 0, 1]].re, 3.0);
        assert_eq!(ts.params[[0, 1, 1]].re, 4.0);
    }

    #[test]
    fn test_record_spanning_lines() {
        let content = "# Hz S RI R 50\n\
                       1 1 0 2 0 3 0\n\
                       4 0 5 0 6 0\n\
                       7 0 8 0 9 0\n";
        let ts = Touchstone::from_str(content, 3).unwrap();
        assert_eq!(ts.nfreq(), 1);
        assert_eq!(ts.params[[0, 0, 2]].re, 3.0);
        assert_eq!(ts.params[[0, 2, 0]].re, 7.0);
    }

    #[test]
    fn test_db_format() {
        let content = "# GHz S DB R 50\n1.0 -20 90\n";
        let ts = Touchstone::from_str(content, 1).unwrap();
        let s = ts.params[[0, 0, 0]];
        assert_relative_eq!(s.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.im, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_v1_noise_block_skipped() {
        let content = "# GHz S RI R 50\n\
                       1.0 0 0 1 0 1 0 0 0\n\
                       2.0 0 0 1 0 1 0 0 0\n\
                       ! noise\n\
                       1.0 1.5 0.5 10 0.3\n";
        let ts = Touchstone::from_str(content, 2).unwrap();
        assert_eq!(ts.nfreq(), 2);
    }

    #[test]
    fn test_malformed_data() {
        let err = Touchstone::from_str("# GHz S RI R 50\n1.0 0.1 zz\n", 1).unwrap_err();
        assert!(matches!(err, TouchstoneError::Parse { line: 2, .. }));

        let err = Touchstone::from_str("# GHz S RI R 50\n1.0 0.1\n", 1).unwrap_err();
        assert!(matches!(err, TouchstoneError::Parse { .. }));
    }

    #[test]
    fn test_v2_keywords() {
        let content = "[Version] 2.0\n\
                       # GHz S RI R 50\n\
                       [Number of Ports] 2\n\
                       [Two-Port Data Order] 12_21\n\
                       [Reference] 50\n\
                       75\n\
                       [Number of Frequencies] 1\n\
                       [Network Data]\n\
                       1.0 1 0 2 0 3 0 4 0\n\
                       [End]\n";
        let ts = Touchstone::from_str(content, 0).unwrap();
        assert!(ts.is_v2);
        assert_eq!(ts.nports, 2);
        assert_eq!(ts.z0, vec![50.0, 75.0]);
        // S11 S12 S21 S22
        assert_eq!(ts.params[[0, 0, 1]].re, 2.0);
        assert_eq!(ts.params[[0, 1, 0]].re, 3.0);
    }

    #[test]
    fn test_v2_lower_matrix() {
        let content = "[Version] 2.0\n\
                       # Hz Z RI\n\
                       [Number of Ports] 3\n\
                       [Matrix Format] Lower\n\
                       [Network Data]\n\
                       1 1 0\n\
                       2 0 3 0\n\
                       4 0 5 0 6 0\n";
        let ts = Touchstone::from_str(content, 0).unwrap();
        assert_eq!(ts.param_type, ParameterType::Z);
        assert_eq!(ts.params[[0, 0, 1]].re, 2.0);
        assert_eq!(ts.params[[0, 1, 0]].re, 2.0);
        assert_eq!(ts.params[[0, 0, 2]].re, 4.0);
        assert_eq!(ts.params[[0, 2, 2]].re, 6.0);
    }
}
