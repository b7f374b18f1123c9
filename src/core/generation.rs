//! Request generations.
//!
//! A `Generation` is bumped whenever the work it guards becomes obsolete:
//! a new shell command starts, or the user presses Ctrl-C. Long work carries
//! a `Ticket` taken at start and checks it between steps; a stale ticket
//! means the rest of the work is skipped.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct Generation {
    counter: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct Ticket {
    counter: Arc<AtomicU64>,
    issued: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for work starting now.
    pub fn ticket(&self) -> Ticket {
        Ticket {
            counter: Arc::clone(&self.counter),
            issued: self.counter.load(Ordering::SeqCst),
        }
    }

    /// Invalidate every outstanding ticket.
    pub fn advance(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Advance on every Ctrl-C for the rest of the process, instead of
    /// terminating it.
    pub fn advance_on_interrupt(&self) -> io::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        // registered before returning, so no interrupt is lost
        let mut interrupts = {
            let _guard = rt.enter();
            #[cfg(unix)]
            let s = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
            #[cfg(windows)]
            let s = tokio::signal::windows::ctrl_c()?;
            s
        };
        let generation = self.clone();

        thread::Builder::new()
            .name("interrupt".into())
            .spawn(move || {
                rt.block_on(async {
                    while interrupts.recv().await.is_some() {
                        let n = generation.advance();
                        log::info!("interrupted, generation now {}", n);
                    }
                })
            })?;
        Ok(())
    }
}

impl Ticket {
    /// A ticket nobody can invalidate.
    #[cfg(test)]
    pub fn detached() -> Self {
        Generation::new().ticket()
    }

    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.issued
    }
}
