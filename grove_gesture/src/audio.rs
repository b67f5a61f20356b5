//! Background ambient pad.
//!
//! A slow four-chord loop sustained on a General MIDI pad voice, played on its
//! own thread. Playback is toggled from the UI via commands; when no MIDI port
//! is available the thread runs against a null output and stays silent.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::AudioConfig;
use crate::error::{Error, Result};

/// C – Am – F – G, voiced low and close.
pub const PROGRESSION: [[u8; 4]; 4] = [
    [48, 55, 60, 64],
    [45, 52, 57, 60],
    [41, 48, 53, 57],
    [43, 50, 55, 59],
];

/// How long each chord is held.
pub const CHORD_DURATION: Duration = Duration::from_millis(4_000);

pub fn chord(step: usize) -> [u8; 4] {
    PROGRESSION[step % PROGRESSION.len()]
}

// ════════════════════════════════════════════════════════════════════════════
// AudioCommand — sent to the pad thread
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCommand {
    Play,
    /// Release the sounding chord and go quiet.
    Stop,
    /// Change the pad voice (GM program 0–127).
    SetProgram(u8),
    /// Terminate the thread.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — abstraction over midir / null
// ════════════════════════════════════════════════════════════════════════════

pub(crate) trait MidiOut: Send {
    fn program_change(&mut self, channel: u8, program: u8);
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8);
    fn note_off(&mut self, channel: u8, note: u8);
}

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn program_change(&mut self, channel: u8, program: u8) {
        let _ = self.conn.send(&[0xC0 | (channel & 0x0F), program & 0x7F]);
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        let _ = self.conn.send(&[0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]);
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        let _ = self.conn.send(&[0x80 | (channel & 0x0F), note & 0x7F, 0]);
    }
}

struct NullOut;
impl MidiOut for NullOut {
    fn program_change(&mut self, _ch: u8, _p: u8)  {}
    fn note_on(&mut self, _ch: u8, _n: u8, _v: u8) {}
    fn note_off(&mut self, _ch: u8, _n: u8)        {}
}

/// Port-name fragments of common software synths.
const SYNTH_PORT_HINTS: [&str; 5] = ["fluid", "timidity", "microsoft", "gm", "synth"];

/// Connect to the first MIDI output port, preferring a software synth.
fn connect_midi() -> Result<MidirOut> {
    let midi_out = midir::MidiOutput::new("grove_pad")
        .map_err(|e| Error::Audio(format!("MIDI init: {}", e)))?;

    let ports = midi_out.ports();
    if ports.is_empty() {
        return Err(Error::Audio(
            "no MIDI output ports found; start a synth such as `fluidsynth` or `timidity -iA`".into(),
        ));
    }

    let is_synth = |p: &midir::MidiOutputPort| {
        midi_out
            .port_name(p)
            .map(|n| {
                let n = n.to_lowercase();
                SYNTH_PORT_HINTS.iter().any(|hint| n.contains(hint))
            })
            .unwrap_or(false)
    };
    let port_idx = ports.iter().position(is_synth).unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out.port_name(port).unwrap_or_else(|_| "unknown".to_string());
    log::info!("opening MIDI port: {}", name);

    let conn = midi_out
        .connect(port, "grove-pad")
        .map_err(|e| Error::Audio(format!("failed to connect to {}: {}", name, e)))?;
    Ok(MidirOut { conn })
}

/// [`connect_midi`], or a silent output with a warning.
fn open_midi_output() -> Box<dyn MidiOut> {
    match connect_midi() {
        Ok(out) => Box::new(out),
        Err(e) => {
            log::warn!("{} (ambient pad muted)", e);
            Box::new(NullOut)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AmbientPlayer — handle to the pad thread
// ════════════════════════════════════════════════════════════════════════════

pub struct AmbientPlayer {
    cmd_tx:  Sender<AudioCommand>,
    playing: bool,
    thread:  Option<JoinHandle<()>>,
}

impl AmbientPlayer {
    /// Spawn the pad thread. Starts silent.
    pub fn spawn(cfg: &AudioConfig) -> Self {
        let enabled = cfg.enabled;
        Self::spawn_with(cfg, move || {
            if enabled { open_midi_output() } else { Box::new(NullOut) }
        })
    }

    pub(crate) fn spawn_with<F>(cfg: &AudioConfig, open: F) -> Self
    where
        F: FnOnce() -> Box<dyn MidiOut> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let voice = Voice { program: cfg.program, velocity: cfg.velocity, channel: cfg.channel };
        let thread = thread::Builder::new()
            .name("ambient-pad".into())
            .spawn(move || pad_thread(open(), voice, cmd_rx));
        let thread = match thread {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("could not spawn audio thread: {}", e);
                None
            }
        };
        AmbientPlayer { cmd_tx, playing: false, thread }
    }

    pub fn play(&mut self) {
        self.playing = true;
        self.send(AudioCommand::Play);
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.send(AudioCommand::Stop);
    }

    /// Flip playback. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.playing { self.stop() } else { self.play() }
        self.playing
    }

    pub fn set_program(&self, program: u8) {
        self.send(AudioCommand::SetProgram(program));
    }

    pub fn is_playing(&self) -> bool { self.playing }

    fn send(&self, cmd: AudioCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            log::debug!("audio thread gone, dropped {:?}", cmd);
        }
    }
}

impl Drop for AmbientPlayer {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(AudioCommand::Quit);
        if let Some(t) = self.thread.take() {
            let _ = t.join();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// pad_thread — the actual loop
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
struct Voice {
    program:  u8,
    velocity: u8,
    channel:  u8,
}

fn pad_thread(mut midi: Box<dyn MidiOut>, mut voice: Voice, cmd_rx: Receiver<AudioCommand>) {
    let mut sounding: Option<[u8; 4]> = None;
    let mut step = 0usize;
    let mut next_change = Instant::now();

    midi.program_change(voice.channel, voice.program);

    loop {
        // Sleep until the next chord change, or forever while silent.
        let cmd = if sounding.is_some() {
            let wait = next_change.saturating_duration_since(Instant::now());
            cmd_rx.recv_timeout(wait)
        } else {
            cmd_rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
        };

        match cmd {
            Ok(AudioCommand::Play) => {
                if sounding.is_none() {
                    sounding = Some(strike(midi.as_mut(), &voice, chord(step)));
                    next_change = Instant::now() + CHORD_DURATION;
                }
            }
            Ok(AudioCommand::Stop) => {
                if let Some(notes) = sounding.take() {
                    release(midi.as_mut(), &voice, notes);
                }
            }
            Ok(AudioCommand::SetProgram(p)) => {
                voice.program = p;
                midi.program_change(voice.channel, voice.program);
            }
            Ok(AudioCommand::Quit) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(notes) = sounding.take() {
                    release(midi.as_mut(), &voice, notes);
                }
                return;
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Some(notes) = sounding.take() {
                    release(midi.as_mut(), &voice, notes);
                    step += 1;
                    sounding = Some(strike(midi.as_mut(), &voice, chord(step)));
                    next_change += CHORD_DURATION;
                }
            }
        }
    }
}

fn strike(midi: &mut dyn MidiOut, voice: &Voice, notes: [u8; 4]) -> [u8; 4] {
    for n in notes {
        midi.note_on(voice.channel, n, voice.velocity);
    }
    notes
}

fn release(midi: &mut dyn MidiOut, voice: &Voice, notes: [u8; 4]) {
    for n in notes {
        midi.note_off(voice.channel, n);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq)]
    enum Msg {
        Program(u8),
        On(u8),
        Off(u8),
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Msg>>>);

    impl MidiOut for Recorder {
        fn program_change(&mut self, _ch: u8, p: u8) { self.0.lock().unwrap().push(Msg::Program(p)); }
        fn note_on(&mut self, _ch: u8, n: u8, _v: u8) { self.0.lock().unwrap().push(Msg::On(n)); }
        fn note_off(&mut self, _ch: u8, n: u8)        { self.0.lock().unwrap().push(Msg::Off(n)); }
    }

    fn silent() -> AudioConfig {
        AudioConfig { enabled: false, ..AudioConfig::default() }
    }

    fn wait_until<F: Fn() -> bool>(done: F) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if done() { return true; }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn progression_wraps() {
        assert_eq!(chord(0), chord(PROGRESSION.len()));
        assert_ne!(chord(0), chord(1));
    }

    #[test]
    fn toggle_flips_state() {
        let mut p = AmbientPlayer::spawn(&silent());
        assert!(!p.is_playing());
        assert!(p.toggle());
        assert!(!p.toggle());
    }

    #[test]
    fn play_strikes_and_stop_releases_the_chord() {
        let rec = Recorder::default();
        let log = Arc::clone(&rec.0);
        let mut p = AmbientPlayer::spawn_with(&silent(), move || Box::new(rec) as Box<dyn MidiOut>);

        p.play();
        assert!(wait_until(|| log.lock().unwrap().iter().filter(|m| matches!(m, Msg::On(_))).count() == 4));
        p.stop();
        assert!(wait_until(|| log.lock().unwrap().iter().filter(|m| matches!(m, Msg::Off(_))).count() == 4));

        let msgs = log.lock().unwrap().clone();
        assert_eq!(msgs[0], Msg::Program(AudioConfig::default().program));
        for n in chord(0) {
            assert!(msgs.contains(&Msg::On(n)));
            assert!(msgs.contains(&Msg::Off(n)));
        }
    }

    #[test]
    fn drop_releases_sounding_notes() {
        let rec = Recorder::default();
        let log = Arc::clone(&rec.0);
        {
            let mut p = AmbientPlayer::spawn_with(&silent(), move || Box::new(rec) as Box<dyn MidiOut>);
            p.play();
        }
        // drop joined the thread, so everything is recorded
        let msgs = log.lock().unwrap().clone();
        let ons = msgs.iter().filter(|m| matches!(m, Msg::On(_))).count();
        let offs = msgs.iter().filter(|m| matches!(m, Msg::Off(_))).count();
        assert_eq!(ons, offs);
    }
}
