//! Long-lived capture thread
//!
//! On X11 the clipboard is served by the process that last wrote it, through
//! the `arboard::Clipboard` it wrote with. After a restore this process owns
//! the user's clipboard, so the capture instance lives on a dedicated thread
//! for the whole daemon lifetime instead of being dropped after each call.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc as std_mpsc;
use std::thread;

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use super::clipboard::ClipboardBackend;
use super::inject::KeyInjector;
use super::selection::SelectionCapture;
use super::CaptureError;
use crate::config::CaptureConfig;

type Reply = oneshot::Sender<String>;

/// Handle to the thread that owns the clipboard
///
/// Requests are served one at a time, which also keeps captures from
/// interleaving on the shared clipboard. Dropping the handle stops the thread.
pub struct CaptureWorker {
    requests: std_mpsc::Sender<Reply>,
}

impl CaptureWorker {
    /// Worker backed by the system clipboard and `rdev` injection
    pub fn system(config: &CaptureConfig) -> Result<Self, CaptureError> {
        let config = config.clone();
        Self::spawn(move || SelectionCapture::system(&config))
    }

    /// Spawn the worker thread
    ///
    /// `open` builds the capture on the worker thread, so the backends need
    /// not be `Send`. It runs lazily on the first request and again after a
    /// failed open or a panicked capture; otherwise the instance is reused.
    pub fn spawn<F, C, K>(mut open: F) -> Result<Self, CaptureError>
    where
        F: FnMut() -> Result<SelectionCapture<C, K>, CaptureError> + Send + 'static,
        C: ClipboardBackend,
        K: KeyInjector,
    {
        let (requests, rx) = std_mpsc::channel::<Reply>();

        thread::Builder::new()
            .name("selection-capture".to_owned())
            .spawn(move || {
                info!("capture worker started");
                let mut capture = None;
                for reply in rx {
                    let text = serve(&mut capture, &mut open);
                    if reply.send(text).is_err() {
                        debug!("capture requester went away");
                    }
                }
                info!("capture worker stopped");
            })
            .map_err(|e| CaptureError::Worker(e.to_string()))?;

        Ok(Self { requests })
    }

    /// Capture the current selection, or an empty string
    pub async fn capture(&self) -> String {
        let (reply, response) = oneshot::channel();
        if self.requests.send(reply).is_err() {
            error!("capture worker is not running");
            return String::new();
        }

        response.await.unwrap_or_else(|_| {
            error!("capture worker dropped the request");
            String::new()
        })
    }
}

fn serve<F, C, K>(capture: &mut Option<SelectionCapture<C, K>>, open: &mut F) -> String
where
    F: FnMut() -> Result<SelectionCapture<C, K>, CaptureError>,
    C: ClipboardBackend,
    K: KeyInjector,
{
    if capture.is_none() {
        match open() {
            Ok(opened) => *capture = Some(opened),
            Err(e) => {
                warn!(error = %e, "clipboard unavailable, skipping capture");
                return String::new();
            }
        }
    }
    let Some(active) = capture.as_mut() else {
        return String::new();
    };

    match panic::catch_unwind(AssertUnwindSafe(|| active.capture())) {
        Ok(text) => text,
        Err(_) => {
            // The guard already restored the clipboard; reopen on the next request
            error!("selection capture panicked");
            *capture = None;
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::capture::{CaptureTiming, ClipboardSnapshot};

    /// Counts opened and still-alive clipboards across the worker thread
    #[derive(Default)]
    struct Counters {
        opens: AtomicUsize,
        live: AtomicUsize,
        captures: AtomicUsize,
    }

    struct SharedClipboard {
        content: Rc<RefCell<ClipboardSnapshot>>,
        counters: Arc<Counters>,
    }

    impl Drop for SharedClipboard {
        fn drop(&mut self) {
            self.counters.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl ClipboardBackend for SharedClipboard {
        fn read_text(&mut self) -> Result<Option<String>, CaptureError> {
            Ok(match &*self.content.borrow() {
                ClipboardSnapshot::Text(text) => Some(text.clone()),
                _ => None,
            })
        }

        fn write_text(&mut self, text: &str) -> Result<(), CaptureError> {
            *self.content.borrow_mut() = ClipboardSnapshot::Text(text.to_owned());
            Ok(())
        }

        fn snapshot(&mut self) -> Result<ClipboardSnapshot, CaptureError> {
            Ok(self.content.borrow().clone())
        }

        fn restore(&mut self, snapshot: &ClipboardSnapshot) -> Result<(), CaptureError> {
            *self.content.borrow_mut() = snapshot.clone();
            Ok(())
        }
    }

    /// Copies a fixed selection; panics on the capture numbered `panic_on`
    struct SelectingInjector {
        content: Rc<RefCell<ClipboardSnapshot>>,
        counters: Arc<Counters>,
        panic_on: Option<usize>,
    }

    impl KeyInjector for SelectingInjector {
        fn send_copy(&mut self) -> Result<(), CaptureError> {
            let n = self.counters.captures.fetch_add(1, Ordering::SeqCst);
            if self.panic_on == Some(n) {
                panic!("copy exploded");
            }
            *self.content.borrow_mut() = ClipboardSnapshot::Text("selected".to_owned());
            Ok(())
        }
    }

    fn opener(
        counters: &Arc<Counters>,
        fail_first_open: bool,
        panic_on: Option<usize>,
    ) -> impl FnMut() -> Result<SelectionCapture<SharedClipboard, SelectingInjector>, CaptureError>
           + Send
           + 'static {
        let counters = Arc::clone(counters);
        move || {
            let attempt = counters.opens.fetch_add(1, Ordering::SeqCst);
            if fail_first_open && attempt == 0 {
                return Err(CaptureError::Clipboard("no display".to_owned()));
            }
            counters.live.fetch_add(1, Ordering::SeqCst);
            let content = Rc::new(RefCell::new(ClipboardSnapshot::Text("user".to_owned())));
            Ok(SelectionCapture::new(
                SharedClipboard {
                    content: Rc::clone(&content),
                    counters: Arc::clone(&counters),
                },
                SelectingInjector {
                    content,
                    counters: Arc::clone(&counters),
                    panic_on,
                },
                CaptureTiming {
                    clear_delay: Duration::ZERO,
                    copy_delay: Duration::ZERO,
                },
            ))
        }
    }

    #[test]
    fn test_clipboard_outlives_each_capture() {
        let counters = Arc::new(Counters::default());
        let worker = CaptureWorker::spawn(opener(&counters, false, None)).unwrap();

        assert_eq!(tokio_test::block_on(worker.capture()), "selected");
        assert_eq!(counters.live.load(Ordering::SeqCst), 1);

        assert_eq!(tokio_test::block_on(worker.capture()), "selected");
        assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
        assert_eq!(counters.live.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_open_is_retried() {
        let counters = Arc::new(Counters::default());
        let worker = CaptureWorker::spawn(opener(&counters, true, None)).unwrap();

        assert_eq!(tokio_test::block_on(worker.capture()), "");
        assert_eq!(tokio_test::block_on(worker.capture()), "selected");
        assert_eq!(counters.opens.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicked_capture_reopens() {
        let counters = Arc::new(Counters::default());
        let worker = CaptureWorker::spawn(opener(&counters, false, Some(0))).unwrap();

        assert_eq!(tokio_test::block_on(worker.capture()), "");
        assert_eq!(tokio_test::block_on(worker.capture()), "selected");
        assert_eq!(counters.opens.load(Ordering::SeqCst), 2);
        assert_eq!(counters.live.load(Ordering::SeqCst), 1);
    }
}
