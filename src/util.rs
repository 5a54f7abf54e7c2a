use std::time::{Duration, SystemTime};

/// Cooperative cancellation, polled by long running computations.
pub trait Stopper {
    fn stop(&mut self) -> bool;
    fn init(&mut self);
}

#[derive(Clone, Debug)]
pub struct Timer {
    timer: SystemTime,
    duration: Duration,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            timer: SystemTime::now(),
            duration,
        }
    }
}

impl Stopper for Timer {
    fn stop(&mut self) -> bool {
        self.timer
            .elapsed()
            .map_or(false, |elapsed| elapsed > self.duration)
    }

    fn init(&mut self) {
        self.timer = SystemTime::now();
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NeverStop;

impl Stopper for NeverStop {
    fn stop(&mut self) -> bool {
        false
    }

    fn init(&mut self) {}
}

#[cfg(test)]
mod tests {
    use crate::util::{NeverStop, Stopper, Timer};
    use std::time::Duration;

    #[test]
    fn timer_expires() {
        let mut timer = Timer::new(Duration::from_millis(0));
        timer.init();
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.stop());

        let mut timer = Timer::new(Duration::from_secs(3600));
        timer.init();
        assert!(!timer.stop());
        assert!(!NeverStop.stop());
    }
}
