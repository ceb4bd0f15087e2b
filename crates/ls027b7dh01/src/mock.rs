//! Recording bus and pin doubles.

use core::convert::Infallible;

use embedded_hal::{
    digital::{self, OutputPin},
    spi::{self, Operation, SpiDevice},
};

/// SPI device that records every write and delay.
#[derive(Debug, Default)]
pub(crate) struct RecordingSpi {
    pub(crate) writes: Vec<Vec<u8>>,
    pub(crate) delays: Vec<u32>,
}

impl spi::ErrorType for RecordingSpi {
    type Error = Infallible;
}

impl SpiDevice<u8> for RecordingSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        for op in operations.iter() {
            match op {
                Operation::Write(bytes) => self.writes.push(bytes.to_vec()),
                Operation::DelayNs(ns) => self.delays.push(*ns),
                _ => {}
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct NoPin;

impl digital::ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
