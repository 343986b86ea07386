use foundation::geo::GeoPoint;
use foundation::math::{Vec3, spherical};

use crate::camera::Camera3D;

/// Delay between the end of an interaction and auto-rotation resuming, so a
/// user who immediately drags again never sees the globe twitch.
pub const SETTLE_DELAY_S: f64 = 1.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RotationState {
    Auto,
    Paused,
}

/// One in-flight camera transition. At most one exists at a time; a new
/// flight replaces the active one immediately.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraFlight {
    start_position: Vec3,
    target_position: Vec3,
    elapsed_s: f64,
    duration_s: f64,
}

impl CameraFlight {
    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    let u = 1.0 - t;
    1.0 - u * u * u
}

/// Owns the camera, the active flight, and the rotation toggle.
///
/// Single writer for all of this state; the frame step only reads it. Writes
/// happen at event boundaries (drag start/end, flight start/completion,
/// explicit toggle), never mid-frame.
#[derive(Debug)]
pub struct CameraDirector {
    camera: Camera3D,
    flight: Option<CameraFlight>,
    rotation: RotationState,
    /// An explicit user pause is sticky: settle resume never overrides it.
    user_paused: bool,
    settle_s: Option<f64>,
    dragging: bool,
}

impl Default for CameraDirector {
    fn default() -> Self {
        Self::new(Camera3D::default())
    }
}

impl CameraDirector {
    pub fn new(camera: Camera3D) -> Self {
        Self {
            camera,
            flight: None,
            rotation: RotationState::Auto,
            user_paused: false,
            settle_s: None,
            dragging: false,
        }
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn rotation_state(&self) -> RotationState {
        self.rotation
    }

    pub fn rotation_enabled(&self) -> bool {
        self.rotation == RotationState::Auto
    }

    pub fn flight(&self) -> Option<&CameraFlight> {
        self.flight.as_ref()
    }

    /// Starts a flight toward `target`, replacing any active flight.
    ///
    /// The destination sits along the surface normal through the target
    /// point, `distance_factor` globe radii out, aimed at the globe center.
    /// Auto-rotation pauses for the duration of the flight.
    pub fn fly_to(&mut self, target: GeoPoint, distance_factor: f64, duration_s: f64) {
        let Some(dir) = spherical::to_vector(target, 1.0).normalized() else {
            return;
        };

        self.flight = Some(CameraFlight {
            start_position: self.camera.position,
            target_position: dir.scale(-distance_factor),
            elapsed_s: 0.0,
            duration_s: duration_s.max(f64::EPSILON),
        });
        self.rotation = RotationState::Paused;
        self.settle_s = None;
    }

    /// Advances the active flight and the settle timer.
    pub fn update(&mut self, dt_s: f64) {
        if let Some(flight) = &mut self.flight {
            flight.elapsed_s += dt_s;
            let t = (flight.elapsed_s / flight.duration_s).clamp(0.0, 1.0);
            self.camera.position = flight
                .start_position
                .lerp(flight.target_position, ease_out_cubic(t));
            self.camera.target = Vec3::ZERO;

            if t >= 1.0 {
                self.flight = None;
                self.settle_s = Some(SETTLE_DELAY_S);
            }
            return;
        }

        if let Some(settle) = &mut self.settle_s {
            *settle -= dt_s;
            if *settle <= 0.0 {
                self.settle_s = None;
                if !self.user_paused && !self.dragging {
                    self.rotation = RotationState::Auto;
                }
            }
        }
    }

    /// Drag start: force-cancels any flight (the camera freezes where it is,
    /// no partial apply) and pauses rotation.
    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.flight = None;
        self.settle_s = None;
        self.rotation = RotationState::Paused;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.settle_s = Some(SETTLE_DELAY_S);
    }

    /// Orbit input; suppressed while a flight owns the camera.
    pub fn orbit(&mut self, delta_x: f64, delta_y: f64) {
        if self.flight.is_some() {
            return;
        }
        self.camera.orbit(delta_x, delta_y);
    }

    /// Zoom input; suppressed while a flight owns the camera.
    pub fn zoom(&mut self, delta: f64) {
        if self.flight.is_some() {
            return;
        }
        self.camera.zoom(delta);
    }

    /// Explicit user toggle of the idle spin.
    pub fn toggle_rotation(&mut self) {
        if self.rotation == RotationState::Auto {
            self.rotation = RotationState::Paused;
            self.user_paused = true;
        } else {
            self.rotation = RotationState::Auto;
            self.user_paused = false;
            self.settle_s = None;
        }
    }
}
