//! Hand tracking and gesture classification, on its own thread.
//!
//! The public interface is [`InferenceEvent`] published into a latest-value
//! slot. The render loop does not care whether frames came from real hardware
//! or from the mouse/keyboard simulator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use grove_blend::{Classification, GestureLabel, Handedness, LandmarkSet};

use crate::error::Result;
use crate::slot::{latest_slot, SlotReader, SlotWriter};

// ════════════════════════════════════════════════════════════════════════════
// InferenceFrame / InferenceEvent
// ════════════════════════════════════════════════════════════════════════════

/// One processed video frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InferenceFrame {
    /// Capture time relative to the source's start.
    pub timestamp:      Duration,
    pub classification: Option<Classification>,
    /// Zero to two hands.
    pub landmarks:      Vec<LandmarkSet>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InferenceEvent {
    Frame(InferenceFrame),
    /// The source stopped for good; the message is shown to the user.
    Failed(String),
}

// ════════════════════════════════════════════════════════════════════════════
// InferenceSource — what the tracking thread runs
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can produce [`InferenceEvent`]s until cancelled.
pub trait InferenceSource: Send + 'static {
    fn name(&self) -> &'static str;

    /// Publish frames until `cancel` is set or the input goes away. An `Err`
    /// means the source could not (or can no longer) track hands.
    fn run(self: Box<Self>, out: &mut SlotWriter<InferenceEvent>, cancel: &AtomicBool) -> Result<()>;
}

// ════════════════════════════════════════════════════════════════════════════
// InferenceHandle — spawn / poll / cancel
// ════════════════════════════════════════════════════════════════════════════

pub struct InferenceHandle {
    reader: SlotReader<InferenceEvent>,
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

/// Spawn a source on its own thread.
pub fn spawn_inference_source(source: Box<dyn InferenceSource>) -> InferenceHandle {
    let (mut writer, reader) = latest_slot();
    let cancel = Arc::new(AtomicBool::new(false));
    let thread_cancel = Arc::clone(&cancel);
    let name = source.name();

    let thread = thread::Builder::new()
        .name(format!("inference-{}", name))
        .spawn(move || {
            log::info!("inference source '{}' started", name);
            match source.run(&mut writer, &thread_cancel) {
                Ok(()) => log::info!("inference source '{}' stopped", name),
                Err(e) => {
                    log::error!("inference source '{}' failed: {}", name, e);
                    writer.publish(InferenceEvent::Failed(e.to_string()));
                }
            }
        });

    let thread = match thread {
        Ok(t) => Some(t),
        Err(e) => {
            log::error!("could not spawn inference thread: {}", e);
            None
        }
    };
    InferenceHandle { reader, cancel, thread }
}

impl InferenceHandle {
    /// The newest event not yet seen, if any.
    pub fn poll(&mut self) -> Option<Arc<InferenceEvent>> {
        self.reader.take_fresh()
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Ask the source to stop and wait for it.
    pub fn shutdown(&mut self) {
        self.cancel.store(true, Ordering::Release);
        if let Some(t) = self.thread.take() {
            if t.join().is_err() {
                log::warn!("inference thread panicked");
            }
        }
    }
}

impl Drop for InferenceHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimInferenceSource — mouse + keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input snapshot from the visualizer window, sent every rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimInput {
    /// Gesture key currently held.
    pub gesture: Option<GestureLabel>,
    /// Pointer in normalized image coordinates while the hand button is held.
    pub pointer: Option<SimPointer>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimPointer {
    pub x: f32,
    pub y: f32,
    /// Add a second hand mirrored around the image center.
    pub mirrored: bool,
}

/// Confidence the simulator reports for a held gesture key.
pub const SIM_CONFIDENCE: f32 = 0.9;

/// Samples the latest [`SimInput`] at a fixed camera cadence.
pub struct SimInferenceSource {
    rx:     Receiver<SimInput>,
    period: Duration,
}

impl SimInferenceSource {
    pub fn new(rx: Receiver<SimInput>, fps: f32) -> Self {
        let fps = if fps.is_finite() { fps.clamp(1.0, 240.0) } else { 30.0 };
        SimInferenceSource { rx, period: Duration::from_secs_f32(1.0 / fps) }
    }
}

/// What the simulated camera sees for one input snapshot.
pub fn sim_frame(input: &SimInput, timestamp: Duration) -> InferenceFrame {
    let classification = input
        .gesture
        .filter(|g| *g != GestureLabel::None)
        .map(|g| Classification::new(g.as_str(), SIM_CONFIDENCE));

    let mut landmarks = Vec::new();
    if let Some(p) = input.pointer {
        landmarks.push(LandmarkSet::single(Some(Handedness::Left), p.x, p.y));
        if p.mirrored {
            landmarks.push(LandmarkSet::single(Some(Handedness::Right), 1.0 - p.x, p.y));
        }
    }
    InferenceFrame { timestamp, classification, landmarks }
}

impl InferenceSource for SimInferenceSource {
    fn name(&self) -> &'static str { "sim" }

    fn run(self: Box<Self>, out: &mut SlotWriter<InferenceEvent>, cancel: &AtomicBool) -> Result<()> {
        let start = Instant::now();
        let mut input = SimInput::default();

        while !cancel.load(Ordering::Acquire) {
            loop {
                match self.rx.try_recv() {
                    Ok(i) => input = i,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return Ok(()),
                }
            }
            out.publish(InferenceEvent::Frame(sim_frame(&input, start.elapsed())));
            thread::sleep(self.period);
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapInferenceSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Finger-extension pattern → gesture label. Order: thumb, index, middle,
/// ring, pinky.
pub fn classify_extension(extended: [bool; 5]) -> GestureLabel {
    match extended {
        [false, false, false, false, false] => GestureLabel::ClosedFist,
        [true, true, true, true, true]      => GestureLabel::OpenPalm,
        [_, true, true, false, false]       => GestureLabel::Victory,
        [_, true, false, false, false]      => GestureLabel::PointingUp,
        [true, false, false, false, false]  => GestureLabel::ThumbUp,
        _ => GestureLabel::None,
    }
}

/// Leap palm position (mm, device frame) → normalized image coordinates as a
/// mirrored camera would report them.
pub fn leap_palm_to_image(x: f32, y: f32) -> (f32, f32) {
    ((0.5 - x / 400.0).clamp(0.0, 1.0), (1.0 - (y - 100.0) / 400.0).clamp(0.0, 1.0))
}

/// Gesture source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
#[cfg(feature = "leap")]
pub struct LeapInferenceSource;

#[cfg(feature = "leap")]
impl InferenceSource for LeapInferenceSource {
    fn name(&self) -> &'static str { "leap" }

    fn run(self: Box<Self>, out: &mut SlotWriter<InferenceEvent>, cancel: &AtomicBool) -> Result<()> {
        use leaprs::*;
        use crate::error::Error;

        const LEAP_CONFIDENCE: f32 = 0.8;

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| Error::Inference(format!("LeapC connection: {:?}", e)))?;
        connection
            .open()
            .map_err(|e| Error::Inference(format!("LeapMotion device: {:?}", e)))?;

        let start = Instant::now();
        while !cancel.load(Ordering::Acquire) {
            let msg = match connection.poll(100) {
                Ok(m) => m,
                Err(e) => {
                    log::debug!("leap poll: {:?}", e);
                    continue;
                }
            };

            if let Event::Tracking(frame) = msg.event() {
                let mut landmarks = Vec::new();
                let mut classification = None;
                for hand in frame.hands() {
                    let side = if hand.hand_type() == HandType::Left {
                        Handedness::Left
                    } else {
                        Handedness::Right
                    };
                    let palm = hand.palm().position();
                    let (x, y) = leap_palm_to_image(palm.x, palm.y);
                    landmarks.push(LandmarkSet::single(Some(side), x, y));

                    if classification.is_none() {
                        let mut extended = [false; 5];
                        for (i, digit) in hand.digits().enumerate().take(5) {
                            extended[i] = finger_extension(&digit) > 0.6;
                        }
                        let label = classify_extension(extended);
                        if label != GestureLabel::None {
                            classification = Some(Classification::new(label.as_str(), LEAP_CONFIDENCE));
                        }
                    }
                }
                out.publish(InferenceEvent::Frame(InferenceFrame {
                    timestamp: start.elapsed(),
                    classification,
                    landmarks,
                }));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "leap")]
fn finger_extension(digit: &leaprs::Digit) -> f32 {
    // tip-to-knuckle distance over a typical ~80 mm finger
    let base = digit.metacarpal().prev_joint();
    let tip  = digit.distal().next_joint();
    let dx   = tip.x - base.x;
    let dy   = tip.y - base.y;
    let dz   = tip.z - base.z;
    ((dx * dx + dy * dy + dz * dz).sqrt() / 80.0).clamp(0.0, 1.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
