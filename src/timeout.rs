use crate::util::Stopper;
use core::sync::atomic::AtomicBool;
use core::time;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::SystemTime;

static TIMEOUT: AtomicBool = AtomicBool::new(false);

/// Spawns a thread that raises the global timeout flag after `max_duration` seconds.
pub fn initialize_timeout(max_duration: u64) {
    let start_time = SystemTime::now();
    thread::Builder::new()
        .name("timeout".into())
        .spawn(move || loop {
            thread::sleep(time::Duration::from_millis(10));
            if start_time
                .elapsed()
                .map_or(false, |elapsed| elapsed.as_secs() >= max_duration)
            {
                TIMEOUT.store(true, Ordering::SeqCst);
                break;
            }
        })
        .expect("failed to spawn thread");
}

pub fn timeout() -> bool {
    TIMEOUT.load(Ordering::SeqCst)
}

/// Stops once the global timeout fired or, with `handle-ctrlc`, SIGINT was received.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessStopper;

impl Stopper for ProcessStopper {
    fn stop(&mut self) -> bool {
        #[cfg(feature = "handle-ctrlc")]
        if crate::signals::received_ctrl_c() {
            return true;
        }
        timeout()
    }

    fn init(&mut self) {}
}
