//! Simulated oscilloscope.
//!
//! Publishes a noisy sine trace, a cosine trace, trace statistics and a
//! run flag. Payload keys are the instrument's own names, so every channel
//! carries a custom introspection.

use std::f64::consts::PI;

use async_trait::async_trait;
use chanstore_core::domain::resolve;
use chanstore_core::{
    Address, ChannelStore, FieldKey, Introspection, Payload, RoleAssignments,
    generate_introspection,
};
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::producer::ChannelProducer;

const FREQUENCY: f64 = 1000.0;
const AMPLITUDE: f64 = 1.0;
const NUM_DIVISIONS: f64 = 10.0;
const RUN_CHANNEL: &str = "Run";

#[derive(Debug, Clone)]
pub struct ScopeSettings {
    pub points: usize,
    pub noise_amplitude: f64,
    pub time_per_division: f64,
    pub volts_per_division: f64,
    pub trigger_delay: f64,
    pub volt_offset: f64,
}

impl Default for ScopeSettings {
    fn default() -> Self {
        Self {
            points: 1000,
            noise_amplitude: 0.2,
            time_per_division: 0.001,
            volts_per_division: 0.2,
            trigger_delay: 0.0005,
            volt_offset: 0.0,
        }
    }
}

/// One generated frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub sine: Vec<f64>,
    pub cosine: Vec<f64>,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

pub struct SimulatedScope {
    prefix: String,
    settings: ScopeSettings,
    rng: StdRng,
    introspection: Introspection,
    published: Vec<Address>,
}

impl SimulatedScope {
    pub fn new(prefix: impl Into<String>, settings: ScopeSettings) -> Self {
        Self::with_rng(prefix, settings, StdRng::from_entropy())
    }

    pub fn with_rng(prefix: impl Into<String>, settings: ScopeSettings, rng: StdRng) -> Self {
        Self {
            prefix: prefix.into(),
            settings,
            rng,
            introspection: scope_introspection(),
            published: Vec::new(),
        }
    }

    fn address(&self, name: &str) -> Address {
        Address::new(format!("{}{}", self.prefix, name))
    }

    /// Reads the `Run` channel. A missing channel or a non-zero value means running.
    pub fn is_running(&self, store: &dyn ChannelStore) -> bool {
        let address = self.address(RUN_CHANNEL);
        let (payload, introspection) = store.fetch_with_introspection(address.as_str());
        let Some(payload) = payload else {
            return true;
        };
        match resolve(&payload, introspection.as_ref(), FieldKey::Value) {
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(Value::Bool(run)) => *run,
            Some(Value::String(label)) => label != "STOP",
            _ => true,
        }
    }

    /// Generates one frame. Statistics are taken before scaling to divisions.
    pub fn next_frame(&mut self) -> Frame {
        let s = &self.settings;
        let time_step = s.time_per_division * NUM_DIVISIONS / s.points as f64;
        let noise: Vec<f64> = (0..s.points)
            .map(|_| s.noise_amplitude * self.rng.r#gen::<f64>())
            .collect();

        let raw: Vec<f64> = noise
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let t = s.trigger_delay + i as f64 * time_step;
                AMPLITUDE * (t * FREQUENCY * 2.0 * PI).sin() + n
            })
            .collect();
        let raw_cos = noise.iter().enumerate().map(|(i, n)| {
            let t = s.trigger_delay + i as f64 * time_step;
            AMPLITUDE * (t * FREQUENCY * 2.0 * PI).cos() + n
        });

        let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
        let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = if raw.is_empty() {
            0.0
        } else {
            raw.iter().sum::<f64>() / raw.len() as f64
        };

        let y_scale = 1.0 / s.volts_per_division;
        let scale = |v: f64| NUM_DIVISIONS / 2.0 + y_scale * (v + s.volt_offset);
        Frame {
            sine: raw.iter().copied().map(scale).collect(),
            cosine: raw_cos.map(scale).collect(),
            min,
            max,
            mean,
        }
    }
}

/// Overlay for the instrument's field names.
fn scope_introspection() -> Introspection {
    generate_introspection(
        &RoleAssignments::new()
            .with(FieldKey::Connection, "connected")
            .with(FieldKey::Value, "value")
            .with(FieldKey::Severity, "severity")
            .with(FieldKey::WriteAccess, "writable")
            .with(FieldKey::EnumStrings, "enums")
            .with(FieldKey::Unit, "units")
            .with(FieldKey::Precision, "prec")
            .with(FieldKey::UpperLimit, "hilim")
            .with(FieldKey::LowerLimit, "lolim"),
    )
}

fn channel_payload(value: Value, units: &str, prec: u32) -> Payload {
    let mut payload = Payload::new();
    payload.insert("connected".into(), json!(true));
    payload.insert("value".into(), value);
    payload.insert("severity".into(), json!(0));
    payload.insert("writable".into(), json!(false));
    payload.insert("units".into(), json!(units));
    payload.insert("prec".into(), json!(prec));
    payload
}

#[async_trait]
impl ChannelProducer for SimulatedScope {
    fn name(&self) -> &'static str {
        "simulated-scope"
    }

    async fn publish(&mut self, store: &dyn ChannelStore) -> anyhow::Result<()> {
        let first_publish = self.published.is_empty();
        if !first_publish && !self.is_running(store) {
            debug!("acquisition stopped");
            return Ok(());
        }

        let frame = self.next_frame();
        let hilim = NUM_DIVISIONS;

        let mut sine = channel_payload(json!(frame.sine), "div", 5);
        sine.insert("hilim".into(), json!(hilim));
        sine.insert("lolim".into(), json!(0.0));
        let mut cosine = channel_payload(json!(frame.cosine), "div", 5);
        cosine.insert("hilim".into(), json!(hilim));
        cosine.insert("lolim".into(), json!(0.0));

        let mut channels = vec![
            ("Waveform", sine),
            ("Cosine", cosine),
            ("MinValue", channel_payload(json!(frame.min), "V", 4)),
            ("MaxValue", channel_payload(json!(frame.max), "V", 4)),
            ("MeanValue", channel_payload(json!(frame.mean), "V", 4)),
        ];
        // Run は consumer が書き換える制御チャンネル。初期値を 1 度だけ出す
        if first_publish {
            let mut run = channel_payload(json!(1), "", 0);
            run.insert("writable".into(), json!(true));
            run.insert("enums".into(), json!(["STOP", "RUN"]));
            channels.push((RUN_CHANNEL, run));
        }

        for (name, payload) in channels {
            let address = self.address(name);
            // overlay は初回だけ渡す。以降は省略しても保持される
            let introspection = first_publish.then(|| self.introspection.clone());
            store.update(address.clone(), payload, introspection);
            if first_publish {
                self.published.push(address);
            }
        }
        debug!(min = frame.min, max = frame.max, mean = frame.mean, "published frame");
        Ok(())
    }

    async fn shutdown(&mut self, store: &dyn ChannelStore) {
        for address in self.published.drain(..) {
            store.remove(address.as_str());
        }
        info!(producer = self.name(), "channels removed");
    }
}
