use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use vidglass::core::{EngineEvent, MediaEngine};
use vidglass::utils::PlayerError;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(String),
    SetPaused(bool),
    Seek(f64),
    SetVolume(u8),
}

#[derive(Default)]
struct MockState {
    calls: Vec<EngineCall>,
    failing_loads: HashSet<String>,
    events: VecDeque<EngineEvent>,
    duration: Option<f64>,
}

/// Records every command; clones share the same recording.
#[derive(Clone, Default)]
pub struct MockEngine {
    state: Arc<Mutex<MockState>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_loads_of(&self, reference: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_loads
            .insert(reference.to_string());
    }

    pub fn push_event(&self, event: EngineEvent) {
        self.state.lock().unwrap().events.push_back(event);
    }

    pub fn set_duration(&self, duration: Option<f64>) {
        self.state.lock().unwrap().duration = duration;
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Load(reference) => Some(reference),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: EngineCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl MediaEngine for MockEngine {
    fn load(&self, reference: &str) -> Result<(), PlayerError> {
        self.record(EngineCall::Load(reference.to_string()));
        if self.state.lock().unwrap().failing_loads.contains(reference) {
            return Err(PlayerError::command("loadfile", "loading failed"));
        }
        Ok(())
    }

    fn set_paused(&self, paused: bool) -> Result<(), PlayerError> {
        self.record(EngineCall::SetPaused(paused));
        Ok(())
    }

    fn seek_absolute(&self, seconds: f64) -> Result<(), PlayerError> {
        self.record(EngineCall::Seek(seconds));
        Ok(())
    }

    fn set_volume(&self, percent: u8) -> Result<(), PlayerError> {
        self.record(EngineCall::SetVolume(percent));
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        self.state.lock().unwrap().duration
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.state.lock().unwrap().events.drain(..).collect()
    }
}
