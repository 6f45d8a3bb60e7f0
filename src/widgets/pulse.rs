//! Looping, staggered pulse rings.
//!
//! A [`PulseAnimation`] owns `num_pulses` rings. Once started, ring `i`
//! waits `i * duration` milliseconds, then forever repeats one cycle in which
//! its diameter grows from `initial_diameter` to `diameter`, its opacity fades
//! from `initial_opacity` to `target_opacity`, and its corner radius grows to
//! `diameter / 2`, all over `speed` milliseconds. Every cycle starts again
//! from the initial values.
//!
//! ```ignore
//! let mut pulse = pulse_animation(PulseConfig::props().color(Color::RED).num_pulses(4));
//! pulse.start();
//!
//! // host frame loop
//! advance_animations(frame_time);
//! let tree = pulse.render();
//! ```

use bitflags::bitflags;
use sonar_macros::Props;

use super::{view, Color, Style, View};
use crate::animation::{
    cancel_animation, schedule_animation, AnimationHandle, Loop, LoopMode, Parallel, Transition,
    Tween,
};
use crate::reactive::{
    batch, create_signal, dispose_owner, on_cleanup, with_root_owner, OwnerId, Signal,
};

/// Resolved configuration of a [`PulseAnimation`].
///
/// Build a partial override with [`PulseConfig::props`]; unset fields take
/// the defaults listed on each field. Values are not validated.
#[derive(Clone, Debug, PartialEq, Props)]
pub struct PulseConfig {
    /// Ring fill color. Defaults to blue.
    #[prop(default = "Color::BLUE")]
    pub color: Color,
    /// Final ring diameter, also the container width. Defaults to 400.
    #[prop(default = "400.0")]
    pub diameter: f32,
    /// Stagger unit in milliseconds: ring `i` starts after `i * duration`.
    /// Defaults to 2000.
    #[prop(default = "2000.0")]
    pub duration: f32,
    /// Length of one grow-and-fade cycle in milliseconds. Defaults to 300.
    #[prop(default = "300.0")]
    pub speed: f32,
    /// Ring diameter (and corner radius) at the start of each cycle.
    /// Defaults to 0.
    #[prop(default = "0.0")]
    pub initial_diameter: f32,
    /// Ring opacity at the start of each cycle. Defaults to 0.8.
    #[prop(default = "0.8")]
    pub initial_opacity: f32,
    /// Ring opacity at the end of each cycle. Defaults to 0.2.
    #[prop(default = "0.2")]
    pub target_opacity: f32,
    /// Number of rings. Defaults to 3.
    #[prop(default = "3")]
    pub num_pulses: usize,
    /// Container style, merged over the centering base. Defaults to
    /// [`Style::centered`].
    #[prop(default = "Style::centered()")]
    pub style: Style,
    /// Per-ring style, merged last so it overrides the computed ring style.
    pub pulse_style: Style,
}

/// One ring: three animated cells and its position in the stagger.
#[derive(Clone, Debug)]
pub struct Pulse {
    pub key: usize,
    pub diameter: Signal<f32>,
    pub opacity: Signal<f32>,
    pub border_radius: Signal<f32>,
    /// Always zero; rings are centered by the container alignment.
    pub center_offset: f32,
}

impl Pulse {
    pub fn new(key: usize, config: &PulseConfig) -> Self {
        Self {
            key,
            diameter: create_signal(config.initial_diameter),
            opacity: create_signal(config.initial_opacity),
            border_radius: create_signal(config.initial_diameter),
            center_offset: 0.0,
        }
    }

    /// Key of this ring's view among its siblings.
    pub fn view_key(&self) -> String {
        format!("animated_pulse_{}", self.key)
    }

    /// Delay before this ring's first cycle.
    pub fn start_delay_ms(&self, config: &PulseConfig) -> f32 {
        self.key as f32 * config.duration
    }

    /// Write the initial values back into the cells.
    pub fn reset(&self, config: &PulseConfig) {
        self.diameter.set(config.initial_diameter);
        self.opacity.set(config.initial_opacity);
        self.border_radius.set(config.initial_diameter);
    }

    /// The endless grow-and-fade cycle of this ring.
    pub fn timeline(&self, config: &PulseConfig) -> Loop {
        let transition = Transition::linear(config.speed);
        let cycle = Parallel::default()
            .with(Tween::new(self.diameter.clone(), config.diameter).transition(transition.clone()))
            .with(
                Tween::new(self.opacity.clone(), config.target_opacity)
                    .transition(transition.clone()),
            )
            .with(
                Tween::new(self.border_radius.clone(), config.diameter / 2.0)
                    .transition(transition),
            );

        Loop::forever(cycle).mode(LoopMode::Reset)
    }

    /// Snapshot the ring as a view. Reads the cells with tracking.
    pub fn render(&self, config: &PulseConfig) -> View {
        let diameter = self.diameter.get();
        let animated = Style::new()
            .background(config.color)
            .width(diameter)
            .height(diameter)
            .opacity(self.opacity.get())
            .border_radius(self.border_radius.get());

        view()
            .key(self.view_key())
            .style(Style::absolute_fill())
            .style(animated)
            .style(config.pulse_style.clone())
    }
}

/// Fresh rings `0..num_pulses`, each with newly allocated cells.
pub fn build_pulses(config: &PulseConfig) -> Vec<Pulse> {
    (0..config.num_pulses)
        .map(|key| Pulse::new(key, config))
        .collect()
}

bitflags! {
    /// What a configuration change did to a [`PulseAnimation`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ConfigChanges: u8 {
        /// The ring set was rebuilt with new cells
        const PULSES     = 0b001;
        /// Running timelines were cancelled and scheduled again
        const TIMELINES  = 0b010;
        /// The rendered output changes even without animation
        const APPEARANCE = 0b100;
    }
}

// Numbers compare the way dependency checks do: NaN equals NaN, 0.0 and -0.0
// differ.
fn same(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits()
}

/// A set of concentric rings pulsing outward from the center.
///
/// Not animating until [`start`](Self::start). Dropping the widget stops it.
pub struct PulseAnimation {
    config: PulseConfig,
    pulses: Vec<Pulse>,
    timelines: Vec<AnimationHandle>,
    owner: Option<OwnerId>,
}

impl PulseAnimation {
    pub fn new(props: PulseConfigProps) -> Self {
        Self::with_config(props.resolve())
    }

    pub fn with_config(config: PulseConfig) -> Self {
        let pulses = build_pulses(&config);
        Self {
            config,
            pulses,
            timelines: Vec::new(),
            owner: None,
        }
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Handles of the scheduled ring timelines, in ring order.
    pub fn timelines(&self) -> &[AnimationHandle] {
        &self.timelines
    }

    pub fn is_running(&self) -> bool {
        self.owner.is_some()
    }

    /// Schedule every ring's delayed loop. Does nothing while running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let config = &self.config;
        let pulses = &self.pulses;
        // Every cycle starts from the initial values, including the first
        batch(|| pulses.iter().for_each(|pulse| pulse.reset(config)));

        // Top-level scope: only stop() and Drop end the timelines
        let (timelines, owner) = with_root_owner(|| {
            pulses
                .iter()
                .map(|pulse| {
                    let timeline = Box::new(pulse.timeline(config));
                    let handle = schedule_animation(pulse.start_delay_ms(config), timeline);
                    on_cleanup(move || {
                        cancel_animation(handle);
                    });
                    handle
                })
                .collect::<Vec<_>>()
        });

        log::debug!(
            "pulse animation started: {} rings, stagger {}ms, cycle {}ms",
            pulses.len(),
            config.duration,
            config.speed
        );

        self.timelines = timelines;
        self.owner = Some(owner);
    }

    /// Cancel every pending start and running loop. Does nothing when stopped.
    pub fn stop(&mut self) {
        let Some(owner) = self.owner.take() else {
            return;
        };
        dispose_owner(owner);
        self.timelines.clear();
        log::debug!("pulse animation stopped");
    }

    /// Apply new props, merged over the defaults.
    pub fn on_config_change(&mut self, props: PulseConfigProps) -> ConfigChanges {
        self.set_config(props.resolve())
    }

    /// Replace the whole configuration.
    ///
    /// The ring set is rebuilt only when `num_pulses` changes. Running
    /// timelines are re-established when the ring set, `diameter` or
    /// `duration` changes; other timing fields apply at the next
    /// re-establishment or [`start`](Self::start).
    pub fn set_config(&mut self, config: PulseConfig) -> ConfigChanges {
        let mut changes = ConfigChanges::empty();
        let old = &self.config;

        let rebuild = config.num_pulses != old.num_pulses;
        let retime = rebuild || !same(config.diameter, old.diameter) || !same(config.duration, old.duration);
        if rebuild
            || !same(config.diameter, old.diameter)
            || config.color != old.color
            || config.style != old.style
            || config.pulse_style != old.pulse_style
        {
            changes |= ConfigChanges::APPEARANCE;
        }

        let running = self.is_running();
        if running && retime {
            self.stop();
        }

        self.config = config;

        if rebuild {
            log::debug!("rebuilding pulse set with {} rings", self.config.num_pulses);
            self.pulses = build_pulses(&self.config);
            changes |= ConfigChanges::PULSES;
        }

        if running && retime {
            self.start();
            changes |= ConfigChanges::TIMELINES;
        }

        changes
    }

    /// Snapshot the widget as a view tree: a container as wide as `diameter`
    /// holding one absolutely positioned ring per pulse.
    ///
    /// Reads the ring cells with tracking, so calling this inside an effect
    /// re-runs the effect on every animation step.
    pub fn render(&self) -> View {
        let container = Style::centered_container()
            .merge(&self.config.style)
            .merge(&Style::new().width(self.config.diameter));

        view()
            .style(container)
            .children(self.pulses.iter().map(|pulse| pulse.render(&self.config)))
    }
}

impl Default for PulseAnimation {
    fn default() -> Self {
        Self::with_config(PulseConfig::default())
    }
}

impl Drop for PulseAnimation {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Create a [`PulseAnimation`] from partial props.
pub fn pulse_animation(props: PulseConfigProps) -> PulseAnimation {
    PulseAnimation::new(props)
}
