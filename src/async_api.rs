use crate::orchestrator::{GeneratedImage, GenerationState, ImageUpload, Orchestrator, SynthesisService};
use crate::surface::{Canvas, DrawStyle, DrawSurface, Point, Snapshot, SurfaceMetrics};
use crate::{Error, Result, SurfaceConfig};
use futures::future::{BoxFuture, OptionFuture};
use log::debug;
use tokio::sync::{mpsc, oneshot};

enum Command {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    SetStyle(DrawStyle),
    Clear,
    Resize(SurfaceMetrics, oneshot::Sender<Result<()>>),

    // Image source and submission
    SelectUpload(ImageUpload),
    ClearUpload,
    Submit(String, oneshot::Sender<Result<()>>),

    // Queries
    State(oneshot::Sender<GenerationState>),
    Snapshot(oneshot::Sender<Result<Snapshot>>),
    WaitSettled(oneshot::Sender<GenerationState>),

    Close(oneshot::Sender<()>),
}

/// A handle to the studio event loop.
///
/// One task owns the [`Canvas`] and the [`Orchestrator`] and handles every
/// pointer, resize and control event in the order it was sent. The outbound
/// generation call is polled by the same loop, so pointer events keep being
/// processed while it is outstanding. Dropping every handle stops the loop
/// and abandons any pending call.
#[derive(Clone)]
pub struct Studio {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl Studio {
    /// Start the event loop. Must be called from within a Tokio runtime.
    pub fn spawn<S>(config: SurfaceConfig, service: S) -> Result<Self>
    where
        S: SynthesisService + 'static,
    {
        let canvas = Canvas::with_style(config.metrics, config.style)?;
        let orchestrator = Orchestrator::new(service);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<Command>();
        tokio::spawn(run_loop(canvas, orchestrator, cmd_rx));
        Ok(Self { cmd_tx })
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Closed("event loop has stopped".into()))
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command, what: &str) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.send(make(tx))?;
        rx.await
            .map_err(|e| Error::Closed(format!("{} canceled: {}", what, e)))
    }

    pub fn pointer_down(&self, at: Point) -> Result<()> {
        self.send(Command::PointerDown(at))
    }

    pub fn pointer_move(&self, to: Point) -> Result<()> {
        self.send(Command::PointerMove(to))
    }

    pub fn pointer_up(&self) -> Result<()> {
        self.send(Command::PointerUp)
    }

    /// Leaving the surface releases the stroke like pointer-up does
    pub fn pointer_leave(&self) -> Result<()> {
        self.send(Command::PointerLeave)
    }

    pub fn set_style(&self, style: DrawStyle) -> Result<()> {
        self.send(Command::SetStyle(style))
    }

    /// Reset the canvas
    pub fn clear(&self) -> Result<()> {
        self.send(Command::Clear)
    }

    pub async fn resize(&self, metrics: SurfaceMetrics) -> Result<()> {
        self.request(|tx| Command::Resize(metrics, tx), "Resize").await?
    }

    pub fn select_upload(&self, upload: ImageUpload) -> Result<()> {
        self.send(Command::SelectUpload(upload))
    }

    pub fn clear_upload(&self) -> Result<()> {
        self.send(Command::ClearUpload)
    }

    /// Submit the current image with `prompt`.
    ///
    /// Returns once the request is dispatched (state is `Pending`) or
    /// rejected. Use [`Studio::wait_settled`] for the outcome.
    pub async fn submit(&self, prompt: &str) -> Result<()> {
        let prompt = prompt.to_string();
        self.request(|tx| Command::Submit(prompt, tx), "Submit").await?
    }

    pub async fn state(&self) -> Result<GenerationState> {
        self.request(Command::State, "State").await
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.request(Command::Snapshot, "Snapshot").await?
    }

    /// Resolve with the state once no request is pending
    pub async fn wait_settled(&self) -> Result<GenerationState> {
        self.request(Command::WaitSettled, "WaitSettled").await
    }

    /// Submit and wait for the outcome
    pub async fn generate(&self, prompt: &str) -> Result<GenerationState> {
        self.submit(prompt).await?;
        self.wait_settled().await
    }

    /// Stop the event loop, abandoning any pending call
    pub async fn close(self) -> Result<()> {
        self.request(Command::Close, "Close").await
    }
}

async fn run_loop<S: SynthesisService>(
    mut canvas: Canvas,
    mut orchestrator: Orchestrator<S>,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut pending: Option<BoxFuture<'static, Result<GeneratedImage>>> = None;
    let mut waiters: Vec<oneshot::Sender<GenerationState>> = Vec::new();

    loop {
        tokio::select! {
            Some(outcome) = OptionFuture::from(pending.as_mut()), if pending.is_some() => {
                pending = None;
                let state = orchestrator.settle(outcome).clone();
                for w in waiters.drain(..) {
                    let _ = w.send(state.clone());
                }
            }
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                match cmd {
                    Command::PointerDown(p) => canvas.pointer_down(p),
                    Command::PointerMove(p) => canvas.extend_stroke(p),
                    Command::PointerUp | Command::PointerLeave => canvas.end_stroke(),
                    Command::SetStyle(style) => canvas.set_style(style),
                    Command::Clear => canvas.clear(),
                    Command::Resize(metrics, resp) => {
                        let _ = resp.send(canvas.resize(metrics));
                    }
                    Command::SelectUpload(upload) => orchestrator.select_upload(upload),
                    Command::ClearUpload => {
                        orchestrator.clear_upload();
                    }
                    Command::Submit(prompt, resp) => {
                        let res = match orchestrator.prepare(&prompt, &canvas) {
                            Ok(request) => {
                                pending = Some(orchestrator.dispatch(request));
                                Ok(())
                            }
                            Err(e) => Err(e),
                        };
                        let _ = resp.send(res);
                    }
                    Command::State(resp) => {
                        let _ = resp.send(orchestrator.state().clone());
                    }
                    Command::Snapshot(resp) => {
                        let _ = resp.send(canvas.export_snapshot());
                    }
                    Command::WaitSettled(resp) => {
                        if pending.is_some() {
                            waiters.push(resp);
                        } else {
                            let _ = resp.send(orchestrator.state().clone());
                        }
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        }
    }
    debug!("studio loop stopped");
}
