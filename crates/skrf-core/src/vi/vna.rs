use ndarray::{Array1, Array3};
use num_complex::Complex64;

use super::{Instrument, InstrumentError};
use crate::frequency::{Frequency, FrequencyUnit, SweepType};
use crate::network::Network;

/// Largest sweep accepted from an instrument
pub const MAX_POINTS: usize = 1_000_000;

/// Vector network analyzer speaking the common SCPI subset
#[derive(Debug)]
pub struct Vna<I> {
    inst: I,
    /// Port reference impedance reported with fetched data
    pub z0: f64,
}

impl<I: Instrument> Vna<I> {
    pub fn new(inst: I) -> Self {
        Self { inst, z0: 50.0 }
    }

    pub fn identify(&mut self) -> Result<String, InstrumentError> {
        self.inst.identify()
    }

    /// Current linear sweep
    pub fn frequency(&mut self) -> Result<Frequency, InstrumentError> {
        let start = self.inst.query_f64("SENS:FREQ:STAR?")?;
        let stop = self.inst.query_f64("SENS:FREQ:STOP?")?;
        let points = self.sweep_points()?;
        let freq = Frequency::new(start, stop, points, FrequencyUnit::Hz, SweepType::Linear);
        Ok(freq.with_unit(FrequencyUnit::GHz))
    }

    /// Sweep point count; must be a whole number no larger than [`MAX_POINTS`]
    fn sweep_points(&mut self) -> Result<usize, InstrumentError> {
        let command = "SENS:SWE:POIN?";
        let points = self.inst.query_f64(command)?;
        if !(points.is_finite() && points >= 0.0 && points.fract() == 0.0 && points <= MAX_POINTS as f64) {
            return Err(InstrumentError::Reply {
                command: command.to_string(),
                reply: points.to_string(),
            });
        }
        Ok(points as usize)
    }

    /// Fetch the active trace as a one-port network
    ///
    /// The instrument returns interleaved real/imaginary pairs.
    pub fn one_port(&mut self) -> Result<Network, InstrumentError> {
        let freq = self.frequency()?;
        let command = "CALC:DATA? SDATA";
        let values = self.inst.query_values(command)?;

        let reply_err = |reason: String| InstrumentError::Reply {
            command: command.to_string(),
            reply: reason,
        };
        if values.len() != 2 * freq.npoints() {
            return Err(reply_err(format!(
                "{} values for {} points",
                values.len(),
                freq.npoints()
            )));
        }

        let s = Array3::from_shape_fn((freq.npoints(), 1, 1), |(f, _, _)| {
            Complex64::new(values[2 * f], values[2 * f + 1])
        });
        let z0 = Array1::from_elem(1, Complex64::new(self.z0, 0.0));
        Network::new(freq, s, z0).map_err(|e| reply_err(e.to_string()))
    }

    pub fn into_inner(self) -> I {
        self.inst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned replies and records commands
    #[derive(Default)]
    struct Scripted {
        sent: Vec<String>,
        replies: VecDeque<String>,
    }

    impl Instrument for Scripted {
        fn write(&mut self, command: &str) -> Result<(), InstrumentError> {
            self.sent.push(command.to_string());
            Ok(())
        }

        fn read(&mut self) -> Result<String, InstrumentError> {
            self.replies.pop_front().ok_or(InstrumentError::Closed)
        }
    }

    fn scripted(replies: &[&str]) -> Scripted {
        Scripted {
            sent: Vec::new(),
            replies: replies.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_one_port() {
        let mut vna = Vna::new(scripted(&["1e9", "2e9", "2", "0.5,0.1,-0.25,0"]));
        let ntwk = vna.one_port().unwrap();

        assert_eq!(ntwk.nfreq(), 2);
        assert_eq!(ntwk.frequency.unit(), FrequencyUnit::GHz);
        assert_eq!(ntwk.s[[1, 0, 0]], Complex64::new(-0.25, 0.0));
        assert_eq!(
            vna.into_inner().sent,
            vec!["SENS:FREQ:STAR?", "SENS:FREQ:STOP?", "SENS:SWE:POIN?", "CALC:DATA? SDATA"]
        );
    }

    #[test]
    fn test_malformed_replies() {
        let mut vna = Vna::new(scripted(&["abc"]));
        assert!(matches!(vna.frequency(), Err(InstrumentError::Reply { .. })));

        let mut vna = Vna::new(scripted(&["1e9", "2e9", "2", "0.5,0.1"]));
        assert!(matches!(vna.one_port(), Err(InstrumentError::Reply { .. })));

        for points in ["1e19", "2.9", "-3", "NaN", "inf"] {
            let mut vna = Vna::new(scripted(&["1e9", "2e9", points]));
            let err = vna.frequency().unwrap_err();
            assert!(
                matches!(err, InstrumentError::Reply { ref command, .. } if command == "SENS:SWE:POIN?"),
                "{} points accepted",
                points
            );
        }
    }
}
