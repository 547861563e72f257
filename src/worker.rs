//! Session worker: a document session on its own thread.
//!
//! Parsing and serializing large documents is CPU heavy. The worker keeps
//! that work off the caller's thread: a [`SessionHandle`] sends one command
//! at a time over a channel and blocks on the reply.
//!
//! ```no_run
//! use pdfmarks::SessionWorker;
//!
//! let mut handle = SessionWorker::spawn()?;
//! handle.open(std::fs::read("book.pdf")?)?;
//! for bookmark in handle.bookmarks()? {
//!     println!("{}", bookmark);
//! }
//! handle.shutdown()?;
//! # Ok::<(), pdfmarks::Error>(())
//! ```

use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::backend::{LopdfBackend, OutlineBackend};
use crate::error::{Error, Result};
use crate::model::{Bookmark, OutlineNode};
use crate::options::SaveOptions;
use crate::session::DocumentSession;

/// Commands waiting in the channel beyond the one being processed.
const COMMAND_QUEUE: usize = 8;

type Reply<T> = Sender<Result<T>>;

enum SessionCommand {
    Open(Vec<u8>, Reply<()>),
    PageCount(Reply<u32>),
    Outline(Reply<Vec<OutlineNode>>),
    Bookmarks(Reply<Vec<Bookmark>>),
    WriteBookmarks(Vec<Bookmark>, Reply<()>),
    Save(Vec<Bookmark>, Reply<Vec<u8>>),
    SetSaveOptions(SaveOptions, Reply<()>),
    Close(Reply<()>),
}

/// Spawns session worker threads.
pub struct SessionWorker;

impl SessionWorker {
    /// Start a worker with a lopdf-backed session and default save options.
    pub fn spawn() -> Result<SessionHandle> {
        Self::spawn_with_options(SaveOptions::default())
    }

    /// Start a worker with a lopdf-backed session.
    pub fn spawn_with_options(options: SaveOptions) -> Result<SessionHandle> {
        Self::spawn_backend::<LopdfBackend>(options)
    }

    /// Start a worker whose session uses backend `B`.
    ///
    /// The session is created on the worker thread, so `B` never crosses
    /// threads.
    pub fn spawn_backend<B>(options: SaveOptions) -> Result<SessionHandle>
    where
        B: OutlineBackend + 'static,
    {
        let (tx, rx) = bounded(COMMAND_QUEUE);
        let thread = std::thread::Builder::new()
            .name("pdfmarks-session".to_string())
            .spawn(move || run::<B>(DocumentSession::with_options(options), rx))?;

        Ok(SessionHandle {
            commands: Some(tx),
            thread: Some(thread),
        })
    }
}

fn run<B: OutlineBackend>(mut session: DocumentSession<B>, commands: Receiver<SessionCommand>) {
    log::debug!("Session worker started");

    // Reply send errors mean the caller gave up waiting; nothing to do.
    for command in commands {
        match command {
            SessionCommand::Open(data, reply) => {
                let _ = reply.send(session.open(&data));
            }
            SessionCommand::PageCount(reply) => {
                let _ = reply.send(session.page_count());
            }
            SessionCommand::Outline(reply) => {
                let _ = reply.send(session.outline());
            }
            SessionCommand::Bookmarks(reply) => {
                let _ = reply.send(session.bookmarks());
            }
            SessionCommand::WriteBookmarks(bookmarks, reply) => {
                let _ = reply.send(session.write_bookmarks(&bookmarks));
            }
            SessionCommand::Save(bookmarks, reply) => {
                let _ = reply.send(session.save(&bookmarks));
            }
            SessionCommand::SetSaveOptions(options, reply) => {
                session.set_save_options(options);
                let _ = reply.send(Ok(()));
            }
            SessionCommand::Close(reply) => {
                session.close();
                let _ = reply.send(Ok(()));
            }
        }
    }

    session.close();
    log::debug!("Session worker stopped");
}

/// Caller side of a session worker.
///
/// Every method takes `&mut self` and waits for its reply, so a handle never
/// has more than one command in flight. Dropping the handle stops the worker.
pub struct SessionHandle {
    commands: Option<Sender<SessionCommand>>,
    thread: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Open a document from raw bytes, replacing the current one.
    pub fn open(&mut self, data: impl Into<Vec<u8>>) -> Result<()> {
        let data = data.into();
        self.call(|reply| SessionCommand::Open(data, reply))
    }

    /// Number of pages of the open document.
    pub fn page_count(&mut self) -> Result<u32> {
        self.call(SessionCommand::PageCount)
    }

    /// The full native outline, nesting included.
    pub fn outline(&mut self) -> Result<Vec<OutlineNode>> {
        self.call(SessionCommand::Outline)
    }

    /// The native outline flattened to top-level bookmarks.
    pub fn bookmarks(&mut self) -> Result<Vec<Bookmark>> {
        self.call(SessionCommand::Bookmarks)
    }

    /// Replace the native outline without serializing.
    pub fn write_bookmarks(&mut self, bookmarks: &[Bookmark]) -> Result<()> {
        let bookmarks = bookmarks.to_vec();
        self.call(|reply| SessionCommand::WriteBookmarks(bookmarks, reply))
    }

    /// Replace the native outline and serialize the document.
    pub fn save(&mut self, bookmarks: &[Bookmark]) -> Result<Vec<u8>> {
        let bookmarks = bookmarks.to_vec();
        self.call(|reply| SessionCommand::Save(bookmarks, reply))
    }

    /// Change the options applied on save.
    pub fn set_save_options(&mut self, options: SaveOptions) -> Result<()> {
        self.call(|reply| SessionCommand::SetSaveOptions(options, reply))
    }

    /// Drop the open document; the worker keeps running.
    pub fn close(&mut self) -> Result<()> {
        self.call(SessionCommand::Close)
    }

    /// Stop the worker and wait for its thread to finish.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn call<T>(&mut self, command: impl FnOnce(Reply<T>) -> SessionCommand) -> Result<T> {
        let commands = self.commands.as_ref().ok_or(Error::WorkerDisconnected)?;
        let (reply, response) = bounded(1);
        commands
            .send(command(reply))
            .map_err(|_| Error::WorkerDisconnected)?;
        response.recv().map_err(|_| Error::WorkerDisconnected)?
    }

    fn stop(&mut self) -> Result<()> {
        // Closing the channel ends the worker loop.
        self.commands.take();
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| Error::Other("session worker panicked".to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("{}", e);
        }
    }
}
