use std::collections::VecDeque;
use std::io;

use rand::Rng;
use sonar_core::RawFrame;
use sonar_core::protocol::POLL_COMMAND;

use super::Uart;

/// Stand-in rangefinder producing random well-formed frames, with optional
/// corrupted checksums and dropped answers.
pub struct SimulatedUart {
    min_mm: u16,
    max_mm: u16,
    corrupt_ratio: f64,
    dropout_ratio: f64,
    rx: VecDeque<u8>,
}

impl SimulatedUart {
    pub fn new(min_mm: u16, max_mm: u16, corrupt_ratio: f64, dropout_ratio: f64) -> Self {
        Self {
            min_mm: min_mm.min(max_mm),
            max_mm: max_mm.max(min_mm),
            corrupt_ratio: probability(corrupt_ratio),
            dropout_ratio: probability(dropout_ratio),
            rx: VecDeque::new(),
        }
    }

    fn answer(&mut self) {
        let mut rng = rand::rng();

        if rng.random_bool(self.dropout_ratio) {
            return;
        }

        let mm = rng.random_range(self.min_mm..=self.max_mm);
        let mut bytes = RawFrame::for_millimeters(mm).bytes();
        if rng.random_bool(self.corrupt_ratio) {
            bytes[3] = bytes[3].wrapping_add(rng.random_range(1..=u8::MAX));
        }

        self.rx.extend(bytes);
    }
}

fn probability(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

impl Uart for SimulatedUart {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        for _ in data.iter().filter(|&&b| b == POLL_COMMAND) {
            self.answer();
        }
        Ok(data.len())
    }

    fn available(&mut self) -> io::Result<usize> {
        Ok(self.rx.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let n = self.rx.len().min(buffer.len());

        for (slot, byte) in buffer.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }

        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_each_poll_with_a_valid_frame() {
        let mut uart = SimulatedUart::new(1000, 2000, 0.0, 0.0);

        for _ in 0..32 {
            uart.write(&[POLL_COMMAND]).unwrap();
            assert_eq!(uart.available().unwrap(), 4);

            let mut frame = [0u8; 4];
            assert_eq!(uart.read(&mut frame).unwrap(), 4);

            let cm = RawFrame::from_bytes(frame).decode().unwrap().get();
            assert!((100..=200).contains(&cm));
        }
    }

    #[test]
    fn corrupted_frames_fail_checksum() {
        let mut uart = SimulatedUart::new(500, 500, 1.0, 0.0);
        uart.write(&[POLL_COMMAND]).unwrap();

        let mut frame = [0u8; 4];
        uart.read(&mut frame).unwrap();
        assert!(RawFrame::from_bytes(frame).validate().is_err());
    }

    #[test]
    fn dropped_answers_leave_nothing_to_read() {
        let mut uart = SimulatedUart::new(500, 500, 0.0, 1.0);
        uart.write(&[POLL_COMMAND]).unwrap();
        assert_eq!(uart.available().unwrap(), 0);
    }

    #[test]
    fn ignores_other_bytes() {
        let mut uart = SimulatedUart::new(500, 500, 0.0, 0.0);
        uart.write(&[0x00, 0xAA]).unwrap();
        assert_eq!(uart.available().unwrap(), 0);
    }
}
