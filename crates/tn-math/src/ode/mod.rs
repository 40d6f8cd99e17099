//! Fixed-step ODE integrators.
//!
//! Every stepper advances a state vector `y` in place by one step `dt` of
//! `dy/dt = f(t, y)`.  The right-hand side is an [`OdeSystem`]: it writes the
//! derivative into an output slice and must not mutate `y`.  Closures with
//! the signature `Fn(Real, &[Real], &mut [Real])` implement it directly.
//!
//! ```
//! use tn_math::ode::rk4_step;
//!
//! // y' = −y
//! let decay = |_t: f64, y: &[f64], dy: &mut [f64]| dy[0] = -y[0];
//! let mut y = [1.0];
//! let mut scratch = [0.0; 5];
//! rk4_step(&decay, 0.0, 0.1, &mut y, &mut scratch).unwrap();
//! assert!((y[0] - (-0.1f64).exp()).abs() < 1e-6);
//! ```

use tn_core::{ensure, Error, Real, Result, Time};

/// Right-hand side `f(t, y) → dy/dt` of an ODE system.
pub trait OdeSystem {
    /// Write the derivative at `(t, y)` into `dydt`.
    fn derivative(&self, t: Time, y: &[Real], dydt: &mut [Real]);
}

impl<F> OdeSystem for F
where
    F: Fn(Time, &[Real], &mut [Real]),
{
    fn derivative(&self, t: Time, y: &[Real], dydt: &mut [Real]) {
        (self)(t, y, dydt)
    }
}

/// Explicit Euler: `y ← y + dt·f(t, y)`.  Local error O(dt²).
pub fn euler_step<S>(f: &S, t: Time, dt: Time, y: &mut [Real]) -> Result<()>
where
    S: OdeSystem + ?Sized,
{
    let mut dy = vec![0.0; y.len()];
    f.derivative(t, y, &mut dy);
    for (yi, di) in y.iter_mut().zip(&dy) {
        *yi += dt * di;
    }
    Ok(())
}

/// Midpoint Runge–Kutta: a half Euler step to a trial state, then a full
/// step with the slope taken there.
pub fn rk2_step<S>(f: &S, t: Time, dt: Time, y: &mut [Real]) -> Result<()>
where
    S: OdeSystem + ?Sized,
{
    let dim = y.len();
    let mut dy = vec![0.0; dim];
    let mut trial = vec![0.0; dim];

    f.derivative(t, y, &mut dy);
    for i in 0..dim {
        trial[i] = y[i] + 0.5 * dt * dy[i];
    }
    f.derivative(t + 0.5 * dt, &trial, &mut dy);
    for (yi, di) in y.iter_mut().zip(&dy) {
        *yi += dt * di;
    }
    Ok(())
}

/// Classic four-stage Runge–Kutta.
///
/// `scratch` holds the four stage slopes and the trial state, so it must
/// have room for `5 · y.len()` values; nothing is allocated per call.
pub fn rk4_step<S>(f: &S, t: Time, dt: Time, y: &mut [Real], scratch: &mut [Real]) -> Result<()>
where
    S: OdeSystem + ?Sized,
{
    let dim = y.len();
    ensure!(
        scratch.len() >= 5 * dim,
        "rk4_step needs {} scratch values, got {}",
        5 * dim,
        scratch.len()
    );
    let (k1, rest) = scratch.split_at_mut(dim);
    let (k2, rest) = rest.split_at_mut(dim);
    let (k3, rest) = rest.split_at_mut(dim);
    let (k4, rest) = rest.split_at_mut(dim);
    let trial = &mut rest[..dim];

    let half = 0.5 * dt;
    f.derivative(t, y, k1);
    for i in 0..dim {
        trial[i] = y[i] + half * k1[i];
    }
    f.derivative(t + half, trial, k2);
    for i in 0..dim {
        trial[i] = y[i] + half * k2[i];
    }
    f.derivative(t + half, trial, k3);
    for i in 0..dim {
        trial[i] = y[i] + dt * k3[i];
    }
    f.derivative(t + dt, trial, k4);

    for i in 0..dim {
        y[i] += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    Ok(())
}

/// Velocity-Verlet for second-order systems.
///
/// The first half of `y` holds positions, the second half velocities; the
/// second half of `f`'s output is read as accelerations.  Positions advance
/// with the current velocity and acceleration, then velocities with the mean
/// of the accelerations before and after the position update.  Both
/// evaluations are made at time `t`, so accelerations must not depend on
/// velocity or time within a step.
pub fn velocity_verlet_step<S>(f: &S, t: Time, dt: Time, y: &mut [Real]) -> Result<()>
where
    S: OdeSystem + ?Sized,
{
    let dim = y.len();
    if dim % 2 != 0 {
        return Err(Error::OddDimension(dim));
    }
    let half = dim / 2;
    let mut before = vec![0.0; dim];
    let mut after = vec![0.0; dim];

    f.derivative(t, y, &mut before);
    for i in 0..half {
        y[i] += y[half + i] * dt + 0.5 * before[half + i] * dt * dt;
    }
    f.derivative(t, y, &mut after);
    for i in half..dim {
        y[i] += 0.5 * (before[i] + after[i]) * dt;
    }
    Ok(())
}

/// Stepper selection for [`integrate_fixed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OdeMethod {
    /// [`euler_step`].
    Euler,
    /// [`rk2_step`].
    Rk2,
    /// [`rk4_step`].
    Rk4,
    /// [`velocity_verlet_step`].
    VelocityVerlet,
}

impl OdeMethod {
    /// Order of the global error.
    pub fn order(self) -> u32 {
        match self {
            OdeMethod::Euler => 1,
            OdeMethod::Rk2 | OdeMethod::VelocityVerlet => 2,
            OdeMethod::Rk4 => 4,
        }
    }
}

/// Integrate from `t0` to `t1` with steps of at most `dt`, updating `y` in
/// place.
///
/// Takes `⌈(t1 − t0)/dt⌉` steps, the last one shortened to land exactly on
/// `t1`.  Integration backwards in time (`t1 < t0`) is allowed; `dt` is
/// always given as a positive width.  Returns the number of steps taken.
pub fn integrate_fixed<S>(
    method: OdeMethod,
    f: &S,
    t0: Time,
    t1: Time,
    dt: Time,
    y: &mut [Real],
) -> Result<usize>
where
    S: OdeSystem + ?Sized,
{
    ensure!(dt > 0.0, "step must be positive, got {dt}");
    ensure!(
        t0.is_finite() && t1.is_finite(),
        "time bounds must be finite, got [{t0}, {t1}]"
    );
    if method == OdeMethod::VelocityVerlet && y.len() % 2 != 0 {
        return Err(Error::OddDimension(y.len()));
    }

    let span = t1 - t0;
    let steps = (span.abs() / dt).ceil() as usize;
    let step = span.signum() * dt;
    let mut scratch = match method {
        OdeMethod::Rk4 => vec![0.0; 5 * y.len()],
        _ => Vec::new(),
    };

    let mut t = t0;
    for n in 0..steps {
        let h = if n + 1 == steps { t1 - t } else { step };
        match method {
            OdeMethod::Euler => euler_step(f, t, h, y)?,
            OdeMethod::Rk2 => rk2_step(f, t, h, y)?,
            OdeMethod::Rk4 => rk4_step(f, t, h, y, &mut scratch)?,
            OdeMethod::VelocityVerlet => velocity_verlet_step(f, t, h, y)?,
        }
        t = if n + 1 == steps { t1 } else { t0 + (n + 1) as Real * step };
    }
    tracing::trace!(?method, steps, t0, t1, "fixed-step integration done");
    Ok(steps)
}
