use log::{debug, info, warn};

use crate::{
    devices::{
        defs::KEYBOARD_DATA,
        keyboard::{self, KeyEvent},
    },
    pic::defs::{EoiPolicy, InterruptController, IRQ_KEYBOARD, IRQ_TIMER},
    x86::hardware::Hardware,
};

use super::defs::TrapFrame;

/// Service one hardware interrupt. The controller is acknowledged before the
/// line is serviced and, under `EoiPolicy::Twice`, once more on the way out.
pub fn handle_irq<H: Hardware>(
    frame: &TrapFrame,
    pics: &InterruptController,
    hw: &mut H,
    policy: EoiPolicy,
) {
    // A vector outside both chips' spans was not raised by the controller
    let irq_number = match pics.line_for_vector(frame.trap_number) {
        Some(line) => line,
        None => {
            warn!(target: "IRQ", "Vector {} is not routed by the PIC", frame.trap_number);
            return;
        }
    };

    pics.send_end_of_interrupt(hw, irq_number);

    match irq_number {
        IRQ_TIMER => timer(),
        IRQ_KEYBOARD => keyboard(hw),
        _ => warn!(target: "IRQ", "Unhandled IRQ {}", irq_number),
    }

    if policy == EoiPolicy::Twice {
        pics.send_end_of_interrupt(hw, irq_number);
    }
}

fn timer() {
    debug!(target: "IRQ", "Timer tick");
}

fn keyboard<H: Hardware>(hw: &mut H) {
    let scancode = hw.read_byte(KEYBOARD_DATA);
    info!(target: "IRQ", "Key pressed! Scancode: 0x{:X}", scancode);

    match keyboard::classify(scancode) {
        KeyEvent::Pressed(name) => info!(target: "KBD", "Key: '{}'", name),
        KeyEvent::Released(code) => debug!(target: "KBD", "Key released: 0x{:X}", code),
        KeyEvent::Unknown(code) => debug!(target: "KBD", "Unknown key pressed: 0x{:X}", code),
    }
}

/// Called by the IRQ trampolines with the saved frame
#[cfg(target_arch = "x86")]
#[no_mangle]
pub extern "C" fn irq_handler(frame: &mut TrapFrame) {
    use crate::{config::EOI_POLICY, pic::PICS, x86::hardware::Cpu};

    handle_irq(frame, &PICS, &mut Cpu, EOI_POLICY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pic::{
        defs::{EOI, MASTER_COMMAND, SLAVE_COMMAND},
        PICS,
    };
    use crate::testing::{capture_logs, logged, FakeHardware};
    use log::Level;

    fn frame(vector: u32) -> TrapFrame {
        TrapFrame {
            trap_number: vector,
            ..TrapFrame::default()
        }
    }

    #[test]
    fn timer_tick_is_logged() {
        let mut hw = FakeHardware::new();

        let logs = capture_logs(|| handle_irq(&frame(32), &PICS, &mut hw, EoiPolicy::Once)).1;

        assert!(logged(&logs, Level::Debug, "IRQ", "Timer tick"));
        assert_eq!(hw.writes, [(MASTER_COMMAND, EOI)]);
    }

    #[test]
    fn keyboard_press_maps_to_key_name() {
        let mut hw = FakeHardware::new();
        hw.push_input(KEYBOARD_DATA, 0x1E);

        let logs = capture_logs(|| handle_irq(&frame(33), &PICS, &mut hw, EoiPolicy::Once)).1;

        assert!(logged(&logs, Level::Info, "IRQ", "Scancode: 0x1E"));
        assert!(logged(&logs, Level::Info, "KBD", "Key: 'A'"));
        assert_eq!(hw.reads, [KEYBOARD_DATA]);
    }

    #[test]
    fn keyboard_release_is_classified_as_release() {
        let mut hw = FakeHardware::new();
        hw.push_input(KEYBOARD_DATA, 0x9E);

        let logs = capture_logs(|| handle_irq(&frame(33), &PICS, &mut hw, EoiPolicy::Once)).1;

        assert!(logged(&logs, Level::Debug, "KBD", "Key released: 0x1E"));
        assert!(!logs.iter().any(|r| r.message.contains("Key: 'A'")));
    }

    #[test]
    fn unknown_press_is_reported_raw() {
        let mut hw = FakeHardware::new();
        hw.push_input(KEYBOARD_DATA, 0x10);

        let logs = capture_logs(|| handle_irq(&frame(33), &PICS, &mut hw, EoiPolicy::Once)).1;

        assert!(logged(&logs, Level::Debug, "KBD", "Unknown key pressed: 0x10"));
    }

    #[test]
    fn unwired_line_warns_and_continues() {
        let mut hw = FakeHardware::new();

        let logs = capture_logs(|| handle_irq(&frame(44), &PICS, &mut hw, EoiPolicy::Once)).1;

        assert!(logged(&logs, Level::Warn, "IRQ", "Unhandled IRQ 12"));
        assert_eq!(hw.writes, [(SLAVE_COMMAND, EOI), (MASTER_COMMAND, EOI)]);
    }

    #[test]
    fn lines_follow_the_controller_offsets() {
        let pics = InterruptController::with_offsets(0x70, 0x78).unwrap();
        let mut hw = FakeHardware::new();
        hw.push_input(KEYBOARD_DATA, 0x1E);

        let logs = capture_logs(|| handle_irq(&frame(0x71), &pics, &mut hw, EoiPolicy::Once)).1;

        assert!(logged(&logs, Level::Info, "KBD", "Key: 'A'"));
        assert!(!logs.iter().any(|r| r.level == Level::Warn));
        assert_eq!(hw.writes, [(MASTER_COMMAND, EOI)]);
    }

    #[test]
    fn vector_outside_the_controller_is_not_acknowledged() {
        let pics = InterruptController::with_offsets(0x70, 0x78).unwrap();
        let mut hw = FakeHardware::new();

        let logs = capture_logs(|| handle_irq(&frame(32), &pics, &mut hw, EoiPolicy::Twice)).1;

        assert!(logged(&logs, Level::Warn, "IRQ", "Vector 32 is not routed by the PIC"));
        assert!(hw.writes.is_empty());
        assert!(hw.reads.is_empty());
    }

    // Characterises the current contract: a second EOI after servicing. The
    // 8259 protocol asks for one per interrupt, see the `single-eoi` feature.
    #[test]
    fn default_policy_acknowledges_twice() {
        let mut hw = FakeHardware::new();

        capture_logs(|| handle_irq(&frame(32), &PICS, &mut hw, EoiPolicy::Twice));

        assert_eq!(hw.writes_to(MASTER_COMMAND), [EOI, EOI]);
    }

    #[test]
    fn slave_line_double_acknowledgement_repeats_both_chips() {
        let mut hw = FakeHardware::new();

        capture_logs(|| handle_irq(&frame(40), &PICS, &mut hw, EoiPolicy::Twice));

        assert_eq!(
            hw.writes,
            [
                (SLAVE_COMMAND, EOI),
                (MASTER_COMMAND, EOI),
                (SLAVE_COMMAND, EOI),
                (MASTER_COMMAND, EOI)
            ]
        );
    }

    #[test]
    fn single_policy_acknowledges_exactly_once() {
        let mut hw = FakeHardware::new();
        hw.push_input(KEYBOARD_DATA, 0x39);

        capture_logs(|| handle_irq(&frame(33), &PICS, &mut hw, EoiPolicy::Once));

        assert_eq!(hw.writes_to(MASTER_COMMAND), [EOI]);
    }
}
