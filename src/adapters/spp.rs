//! Classic Bluetooth SPP transport bridge.
//!
//! Translates Bluedroid SPP stack callbacks into the closed
//! [`TransportEvent`](crate::link::transport::TransportEvent) set consumed
//! by the control loop, and implements the write side of
//! [`LinkTransport`](crate::link::transport::LinkTransport).
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid Classic-BT SPP server via raw
//!   `esp_idf_svc::sys` calls. The stack callback runs in the BT task
//!   context; it must not block, so everything it learns is copied into a
//!   bounded event queue the control loop drains.
//! - **all other targets**: only the event types and queue, for tests and
//!   host builds. Test doubles implement `LinkTransport` directly.
//!
//! ## Send credit
//!
//! Bluedroid reports congestion edges instead of per-write permissions:
//! a permission request is granted immediately while the stack is
//! uncongested, otherwise it is parked and granted on the next
//! "congestion cleared" callback. Either way exactly one
//! [`SppEvent::WriteReady`] is queued per request.

use crate::link::queue::BoundedQueue;

/// Depth of the stack→loop event queue.
pub const SPP_EVENT_QUEUE_DEPTH: usize = 16;

/// Largest inbound payload copied per event; longer indications are
/// split across events (the assembler does not care).
pub const SPP_DATA_CHUNK: usize = 128;

/// RFCOMM MTU the Bluedroid SPP server negotiates for a session.
pub const SPP_MTU: usize = 990;

/// One stack callback, copied out of the BT task context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SppEvent {
    Connected { mtu: usize },
    Disconnected,
    Data(heapless::Vec<u8, SPP_DATA_CHUNK>),
    WriteReady,
}

/// Stack→loop event queue. The BT task produces, the control loop
/// consumes; both sides are non-blocking.
static SPP_EVENTS: BoundedQueue<SppEvent, SPP_EVENT_QUEUE_DEPTH> = BoundedQueue::new();

/// Drain one queued stack event. Called from the control loop.
pub fn poll_event() -> Option<SppEvent> {
    SPP_EVENTS.pop()
}

fn push_event(event: SppEvent) {
    if SPP_EVENTS.push(event).is_err() {
        log::warn!("spp: event queue full, dropping stack event");
    }
}

/// Split an inbound indication into queue-sized `Data` events.
#[allow(dead_code)] // BT callback path; exercised on target only
fn push_data(bytes: &[u8]) {
    for chunk in bytes.chunks(SPP_DATA_CHUNK) {
        let mut copy = heapless::Vec::new();
        // chunks() never exceeds the vec capacity
        let _ = copy.extend_from_slice(chunk);
        push_event(SppEvent::Data(copy));
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF implementation
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    use esp_idf_svc::sys::*;
    use log::{info, warn};

    use super::{SPP_MTU, SppEvent, push_data, push_event};
    use crate::error::{Error, Result};
    use crate::link::transport::{LinkTransport, SendError};

    /// Active RFCOMM connection handle; 0 = no session.
    static SPP_CONN: AtomicU32 = AtomicU32::new(0);
    /// Stack congestion flag mirrored from CONG callbacks.
    static SPP_CONGESTED: AtomicBool = AtomicBool::new(false);
    /// A permission request is parked until congestion clears.
    static SPP_GRANT_PARKED: AtomicBool = AtomicBool::new(false);

    /// Write side of the link transport over Bluedroid SPP.
    pub struct SppTransport;

    impl SppTransport {
        /// Bring up the Bluedroid stack and register the SPP server.
        pub fn start(device_name: &str) -> Result<Self> {
            let mut name = [0u8; 33];
            let len = device_name.len().min(32);
            name[..len].copy_from_slice(&device_name.as_bytes()[..len]);

            // SAFETY: one-shot bring-up from main before the control loop;
            // the BT controller config macro expands to a plain struct.
            unsafe {
                let mut bt_cfg: esp_bt_controller_config_t = core::mem::zeroed();
                bt_cfg.controller_task_stack_size = ESP_TASK_BT_CONTROLLER_STACK as u16;
                bt_cfg.controller_task_prio = ESP_TASK_BT_CONTROLLER_PRIO as u8;
                bt_cfg.bluetooth_mode = esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT as u8;

                if esp_bt_controller_init(&mut bt_cfg) != ESP_OK {
                    return Err(Error::Init("BT controller init failed"));
                }
                if esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT) != ESP_OK {
                    return Err(Error::Init("BT controller enable failed"));
                }
                if esp_bluedroid_init() != ESP_OK || esp_bluedroid_enable() != ESP_OK {
                    return Err(Error::Init("Bluedroid init failed"));
                }

                if esp_spp_register_callback(Some(spp_callback)) != ESP_OK {
                    return Err(Error::Init("SPP callback registration failed"));
                }
                let spp_cfg = esp_spp_cfg_t {
                    mode: esp_spp_mode_t_ESP_SPP_MODE_CB,
                    enable_l2cap_ertm: true,
                    tx_buffer_size: 0,
                };
                if esp_spp_enhanced_init(&spp_cfg) != ESP_OK {
                    return Err(Error::Init("SPP init failed"));
                }

                if esp_bt_gap_set_device_name(name.as_ptr().cast()) != ESP_OK {
                    warn!("spp: setting device name failed");
                }
                if esp_bt_gap_set_scan_mode(
                    esp_bt_connection_mode_t_ESP_BT_CONNECTABLE,
                    esp_bt_discovery_mode_t_ESP_BT_GENERAL_DISCOVERABLE,
                ) != ESP_OK
                {
                    warn!("spp: setting scan mode failed");
                }
            }

            info!("spp: server starting as '{}'", device_name);
            Ok(Self)
        }
    }

    impl LinkTransport for SppTransport {
        fn request_send_permission(&mut self) {
            if SPP_CONN.load(Ordering::Acquire) == 0 {
                return;
            }
            if SPP_CONGESTED.load(Ordering::Acquire) {
                // Granted from the congestion-cleared callback.
                SPP_GRANT_PARKED.store(true, Ordering::Release);
            } else {
                push_event(SppEvent::WriteReady);
            }
        }

        fn send(&mut self, chunk: &[u8]) -> core::result::Result<(), SendError> {
            let conn = SPP_CONN.load(Ordering::Acquire);
            if conn == 0 {
                return Err(SendError::NotConnected);
            }
            // SAFETY: Bluedroid copies the buffer before the call returns.
            let ret = unsafe {
                esp_spp_write(conn, chunk.len() as i32, chunk.as_ptr().cast_mut())
            };
            if ret == ESP_OK {
                Ok(())
            } else {
                Err(SendError::Rejected)
            }
        }
    }

    /// Bluedroid SPP callback — BT task context, must not block.
    unsafe extern "C" fn spp_callback(
        event: esp_spp_cb_event_t,
        param: *mut esp_spp_cb_param_t,
    ) {
        // SAFETY: param points at the union variant matching `event` for
        // the duration of the callback.
        let param = unsafe { &*param };

        match event {
            esp_spp_cb_event_t_ESP_SPP_INIT_EVT => {
                // SAFETY: union field valid for INIT events.
                unsafe {
                    esp_spp_start_srv(
                        esp_spp_sec_t_ESP_SPP_SEC_AUTHENTICATE,
                        esp_spp_role_t_ESP_SPP_ROLE_SLAVE,
                        0,
                        c"Lumen SPP".as_ptr(),
                    );
                }
            }
            esp_spp_cb_event_t_ESP_SPP_SRV_OPEN_EVT => {
                // SAFETY: union field valid for SRV_OPEN events.
                let handle = unsafe { param.srv_open.handle };
                SPP_CONN.store(handle, Ordering::Release);
                SPP_CONGESTED.store(false, Ordering::Release);
                SPP_GRANT_PARKED.store(false, Ordering::Release);
                push_event(SppEvent::Connected { mtu: SPP_MTU });
            }
            esp_spp_cb_event_t_ESP_SPP_CLOSE_EVT => {
                SPP_CONN.store(0, Ordering::Release);
                SPP_GRANT_PARKED.store(false, Ordering::Release);
                push_event(SppEvent::Disconnected);
            }
            esp_spp_cb_event_t_ESP_SPP_DATA_IND_EVT => {
                // SAFETY: union field valid for DATA_IND events; the
                // buffer lives for the duration of the callback.
                let data = unsafe {
                    core::slice::from_raw_parts(
                        param.data_ind.data,
                        param.data_ind.len as usize,
                    )
                };
                push_data(data);
            }
            esp_spp_cb_event_t_ESP_SPP_CONG_EVT => {
                // SAFETY: union field valid for CONG events.
                let congested = unsafe { param.cong.cong };
                SPP_CONGESTED.store(congested, Ordering::Release);
                if !congested && SPP_GRANT_PARKED.swap(false, Ordering::AcqRel) {
                    push_event(SppEvent::WriteReady);
                }
            }
            _ => {}
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::SppTransport;

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_indications_split_into_chunked_events() {
        let payload = vec![0xabu8; SPP_DATA_CHUNK * 2 + 5];
        push_data(&payload);

        let mut total = 0;
        let mut events = 0;
        while let Some(event) = poll_event() {
            match event {
                SppEvent::Data(bytes) => {
                    total += bytes.len();
                    events += 1;
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(events, 3);
        assert_eq!(total, payload.len());
    }
}
