//! KeyMouse daemon entry point.
//!
//! Wires together the infrastructure services and runs the engine's two
//! threads: the event dispatcher on this thread, the motion integrator on
//! its own.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config() + CLI device-name override
//!  └─ with_input_group
//!       ├─ find_device_by_name()   -- /dev/input/event* discovery
//!       └─ UinputPointer::create() -- virtual pointer
//!  └─ EvdevEventSource::grab()     -- exclusive grab
//!  └─ MotionTask::spawn()          -- physics thread (10 ms tick)
//!  └─ EventDispatcher::run()       -- blocking main loop
//!  └─ request_stop() + await_completion()
//! ```
//!
//! Every setup failure exits non-zero before either engine thread starts.
//! The privilege window covers exactly the two operations that need the
//! `input` group: opening the restricted device node and registering the
//! uinput device.

#[cfg(not(target_os = "linux"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("keymoused requires Linux (evdev + uinput)");
}

#[cfg(target_os = "linux")]
fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use anyhow::Context;
    use tracing::{info, warn};
    use tracing_subscriber::EnvFilter;

    use keymouse_core::{BindingTable, KeyStateTable};
    use keymouse_daemon::application::dispatch_events::EventDispatcher;
    use keymouse_daemon::application::drive_pointer::MotionIntegrator;
    use keymouse_daemon::application::lifecycle::MotionTask;
    use keymouse_daemon::infrastructure::event_source::evdev::{
        find_device_by_name, EvdevEventSource,
    };
    use keymouse_daemon::infrastructure::pointer_device::uinput::UinputPointer;
    use keymouse_daemon::infrastructure::pointer_device::PointerSink;
    use keymouse_daemon::infrastructure::privilege;
    use keymouse_daemon::infrastructure::storage::config::load_config;

    // Configuration comes first so its log level can seed the filter.
    let config = load_config().context("failed to load configuration")?;

    // Initialise structured logging. Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.daemon.log_level.clone())),
        )
        .init();

    info!("KeyMouse daemon starting");

    // The only CLI surface: an optional device-name override.
    let device_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.device.name.clone());
    let tuning = config.pointer.tuning().context("invalid pointer tuning")?;
    let tick_interval = config.pointer.tick_interval();

    // ── Privileged setup window ───────────────────────────────────────────────
    // Both the restricted device node and /dev/uinput must be opened while
    // the effective group is `input`; rights are restored before any engine
    // thread exists.
    let setup = privilege::with_input_group(
        || -> anyhow::Result<(evdev::Device, UinputPointer)> {
            let device = find_device_by_name(&device_name)
                .with_context(|| format!("no input device named {device_name:?}"))?;
            let sink = UinputPointer::create().context("failed to create virtual pointer")?;
            Ok((device, sink))
        },
    )
    .context("privilege window failed")?;
    let (device, sink) = setup?;
    let sink: Arc<dyn PointerSink> = Arc::new(sink);

    // ── Exclusive grab ────────────────────────────────────────────────────────
    // From here the physical keyboard's native events stop reaching the
    // rest of the system. Grab refusal is still a setup failure: no thread
    // has started yet.
    let mut source = EvdevEventSource::grab(device).context("exclusive grab failed")?;

    // ── Shared engine state ───────────────────────────────────────────────────
    let keys = Arc::new(KeyStateTable::new());
    let bindings = Arc::new(BindingTable::numpad());

    // ── Start the physics thread before consuming any event ──────────────────
    let integrator = MotionIntegrator::new(
        Arc::clone(&keys),
        Arc::clone(&bindings),
        Arc::clone(&sink),
        tuning,
        tick_interval,
    );
    let motion = MotionTask::spawn(integrator).context("failed to start motion integrator")?;

    info!(device = %device_name, "KeyMouse ready; numpad now drives the pointer");

    // ── Main loop ─────────────────────────────────────────────────────────────
    let dispatcher = EventDispatcher::new(keys, bindings, sink);
    let dispatch_result = dispatcher.run(&mut source);

    // The dispatcher has returned (stream ended or output write failed);
    // stop the integrator at its next tick boundary and wait for it.
    motion.request_stop();
    if let Err(e) = motion.await_completion() {
        warn!("motion integrator did not stop cleanly: {e}");
    }

    dispatch_result.context("event dispatch loop failed")?;
    info!("KeyMouse daemon stopped");
    Ok(())
}
