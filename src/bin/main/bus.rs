use std::convert::Infallible;

use embedded_hal::{
    digital::{self, OutputPin},
    spi::{self, Operation, SpiDevice},
};

/// SPI device that only counts what would go over the wire.
#[derive(Debug, Default)]
pub struct HostSpi {
    pub transactions: usize,
    pub bytes: usize,
}

impl spi::ErrorType for HostSpi {
    type Error = Infallible;
}

impl SpiDevice<u8> for HostSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        self.transactions += 1;
        for op in operations.iter() {
            if let Operation::Write(bytes) = op {
                self.bytes += bytes.len();
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct NullPin;

impl digital::ErrorType for NullPin {
    type Error = Infallible;
}

impl OutputPin for NullPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
