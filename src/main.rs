//! Lumen Firmware — Main Entry Point
//!
//! Hexagonal layout: the protocol engine and lamp logic are pure library
//! modules; this binary wires them to the ESP32 — Bluedroid SPP on the
//! transport side, LEDC PWM on the actuator side — and runs the control
//! loop.
//!
//! ```text
//! BT task ──SppEvent──▶ ┌───────────────────────────────┐
//!                       │ control loop (1 ms base tick)  │
//!                       │  heartbeat → sender re-arm     │
//!                       │  10 ms poll → DeviceService    │──▶ LEDC PWM
//!                       └───────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use lumen::adapters::hardware::HardwareAdapter;
use lumen::adapters::log_sink::LogEventSink;
use lumen::adapters::spp::{self, SppEvent, SppTransport};
use lumen::app::events::AppEvent;
use lumen::app::ports::EventSink;
use lumen::app::service::DeviceService;
use lumen::config::DeviceConfig;
use lumen::drivers::rgb_led::RgbLed;
use lumen::link::{LinkSession, TransportEvent};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Lumen v{} starting", env!("CARGO_PKG_VERSION"));

    let config = DeviceConfig::default();

    // ── 2. PWM outputs ────────────────────────────────────────
    use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, config::TimerConfig};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::units::FromValueType;

    let peripherals = Peripherals::take()?;
    let timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::new().frequency(5.kHz().into()),
    )?;

    // RGB output pins: GPIO25/26/27 on LEDC channels 0-2.
    let red = LedcDriver::new(peripherals.ledc.channel0, &timer, peripherals.pins.gpio25)?;
    let green = LedcDriver::new(peripherals.ledc.channel1, &timer, peripherals.pins.gpio26)?;
    let blue = LedcDriver::new(peripherals.ledc.channel2, &timer, peripherals.pins.gpio27)?;

    let mut hw = HardwareAdapter::new(RgbLed::new(red, green, blue));
    let mut sink = LogEventSink::new();

    // ── 3. Protocol engine + lamp service ─────────────────────
    let mut service = DeviceService::new(&config);
    let mut session = LinkSession::new();

    // Lamp dark at boot, matching the fresh DeviceState.
    service.apply_duties(&mut hw);

    // ── 4. Transport bring-up ─────────────────────────────────
    let mut transport = SppTransport::start(config.device_name.as_str())
        .map_err(|e| anyhow::anyhow!("SPP bring-up: {}", e))?;

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let mut heartbeat_counter: u32 = 0;
    let mut poll_counter: u32 = 0;

    loop {
        esp_idf_hal::delay::FreeRtos::delay_ms(1);

        // Drain BT-task events into the session.
        while let Some(event) = spp::poll_event() {
            match event {
                SppEvent::Connected { mtu } => {
                    sink.emit(&AppEvent::SessionOpened { mtu });
                    session.on_event(TransportEvent::Connected { mtu }, &mut transport);
                }
                SppEvent::Disconnected => {
                    sink.emit(&AppEvent::SessionClosed);
                    session.on_event(TransportEvent::Disconnected, &mut transport);
                }
                SppEvent::Data(bytes) => {
                    session.on_event(TransportEvent::Data(&bytes), &mut transport);
                }
                SppEvent::WriteReady => {
                    session.on_event(TransportEvent::ReadyToSend, &mut transport);
                }
            }
        }

        // Sender re-arm heartbeat.
        heartbeat_counter += 1;
        if heartbeat_counter >= config.heartbeat_interval_ms {
            heartbeat_counter = 0;
            session.on_heartbeat(&mut transport);
        }

        // Command dispatch poll.
        poll_counter += 1;
        if poll_counter >= config.dispatch_poll_interval_ms {
            poll_counter = 0;
            while let Some(line) = session.poll_line() {
                for response in service.handle_line(&line, &mut hw, &mut sink) {
                    let _ = session.send_line(response);
                }
            }
        }
    }
}
