use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const DEFAULT_PLAYER: &str = "ffplay -nodisp -autoexit -loglevel quiet";
const REAP_INTERVAL: Duration = Duration::from_millis(200);

pub(crate) trait AudioSink {
    fn play(&mut self, file: &Path);
    fn stop(&mut self);
}

#[derive(Debug, Default)]
pub(crate) struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _file: &Path) {}

    fn stop(&mut self) {}
}

/// External program invoked as `<program> <args..> <file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlayerCommand {
    program: String,
    args: Vec<String>,
}

impl PlayerCommand {
    pub(crate) fn parse(raw: Option<&str>) -> Option<Self> {
        let mut parts = raw.unwrap_or(DEFAULT_PLAYER).split_whitespace();
        let program = parts.next()?.to_string();
        Some(Self {
            program,
            args: parts.map(str::to_string).collect(),
        })
    }

    fn spawn(&self, file: &Path) -> std::io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }
}

#[derive(Debug)]
enum AudioCommand {
    Play(PathBuf),
    Stop,
    Shutdown,
}

/// Plays files on a worker thread so the UI never blocks on the player.
#[derive(Debug)]
pub(crate) struct AudioServer {
    sender: Sender<AudioCommand>,
    worker: Option<JoinHandle<()>>,
}

impl AudioServer {
    pub(crate) fn start(player: PlayerCommand) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("dlg-audio".to_string())
            .spawn(move || run_worker(player, receiver))
            .map_err(|error| tracing::warn!("audio worker unavailable: {}", error))
            .ok();
        Self { sender, worker }
    }

    fn send(&self, command: AudioCommand) {
        if self.sender.send(command).is_err() {
            tracing::warn!("audio worker has stopped");
        }
    }
}

impl AudioSink for AudioServer {
    fn play(&mut self, file: &Path) {
        self.send(AudioCommand::Play(file.to_path_buf()));
    }

    fn stop(&mut self) {
        self.send(AudioCommand::Stop);
    }
}

impl Drop for AudioServer {
    fn drop(&mut self) {
        let _ = self.sender.send(AudioCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker(player: PlayerCommand, receiver: Receiver<AudioCommand>) {
    let mut current: Option<Child> = None;
    loop {
        match receiver.recv_timeout(REAP_INTERVAL) {
            Ok(AudioCommand::Play(file)) => {
                kill(&mut current);
                match player.spawn(&file) {
                    Ok(child) => {
                        tracing::debug!(file = %file.display(), "playing voice-over");
                        current = Some(child);
                    }
                    Err(error) => {
                        tracing::warn!(
                            program = %player.program,
                            file = %file.display(),
                            "failed to start audio player: {}",
                            error
                        );
                    }
                }
            }
            Ok(AudioCommand::Stop) => kill(&mut current),
            Ok(AudioCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                kill(&mut current);
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                let finished = current
                    .as_mut()
                    .is_some_and(|child| matches!(child.try_wait(), Ok(Some(_))));
                if finished {
                    current = None;
                }
            }
        }
    }
}

fn kill(current: &mut Option<Child>) {
    if let Some(mut child) = current.take() {
        let _ = child.kill();
        let _ = child.wait();
    }
}
