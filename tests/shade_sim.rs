//! End-to-end simulation of the shade controller on the mock platform
//!
//! Drives the full stack the way the firmware's cooperative loop would:
//! classified button events and accessory calls in, decoded RF frames out,
//! with simulated time advancing between ticks.

use somfy_rts::input::{ButtonAction, ButtonEvent, ButtonId, ButtonPanel, PressKind};
use somfy_rts::platform::mock::{MockNvs, MockPulseTrain, MockRadio};
use somfy_rts::platform::traits::NvsInterface;
use somfy_rts::platform::PlatformError;
use somfy_rts::protocol::frame::{decode, Command};
use somfy_rts::{InstallationConfig, ShadeConfig, ShadeController};

type Controller = ShadeController<MockRadio, MockPulseTrain, MockNvs>;

const SEED: u32 = 0x12345;

fn install() -> InstallationConfig {
    InstallationConfig {
        address_seed: SEED,
        ..InstallationConfig::default()
    }
}

fn controller_with_store(store: MockNvs, channels: &[u8]) -> Controller {
    let mut controller =
        ShadeController::new(MockRadio::new(), MockPulseTrain::new(), store, install());
    controller.init_radio().unwrap();
    for &channel in channels {
        controller
            .register_shade(&ShadeConfig::new(channel, "Shade"))
            .unwrap();
    }
    controller
}

fn controller(channels: &[u8]) -> Controller {
    controller_with_store(MockNvs::new(), channels)
}

fn commands(controller: &Controller) -> Vec<(Command, u16, u32)> {
    let pulses = controller.transmitter().pulse_train();
    (0..pulses.transmissions().len())
        .map(|i| {
            let decoded = decode(&pulses.payload(i).unwrap()).unwrap();
            (decoded.command, decoded.rolling_code, decoded.address)
        })
        .collect()
}

fn run_ticks(controller: &mut Controller, from_ms: u64, to_ms: u64, step_ms: u64) {
    let mut now = from_ms;
    while now <= to_ms {
        let _ = controller.tick(now);
        now += step_ms;
    }
}

#[test]
fn registration_validates_channels() {
    let mut controller = controller(&[1, 2]);

    assert!(matches!(
        controller.register_shade(&ShadeConfig::new(0, "Bad")),
        Err(PlatformError::InvalidConfig)
    ));
    assert!(matches!(
        controller.register_shade(&ShadeConfig::new(33, "Bad")),
        Err(PlatformError::InvalidConfig)
    ));
    assert!(matches!(
        controller.register_shade(&ShadeConfig::new(2, "Duplicate")),
        Err(PlatformError::InvalidConfig)
    ));

    // The rejected configurations did not disturb the existing shades.
    assert_eq!(controller.registry().len(), 2);
    assert!(controller.current_position(1).is_some());
}

#[test]
fn addresses_derive_from_seed_and_channel() {
    let mut controller = controller(&[3]);
    controller.set_target_position(3, 100.0, 0).unwrap();

    let sent = commands(&controller);
    assert_eq!(sent.len(), 1);
    let (_, _, address) = sent[0];
    assert_eq!(address, ((SEED & 0x7FFFF) * 32 + 3) & 0xFF_FFFF);
}

#[test]
fn dead_radio_means_no_controllable_shades() {
    let mut radio = MockRadio::new();
    radio.fail_init();
    let mut controller =
        ShadeController::new(radio, MockPulseTrain::new(), MockNvs::new(), install());

    assert!(controller.init_radio().is_err());
    assert!(!controller.is_radio_ready());
    controller
        .register_shade(&ShadeConfig::new(1, "Shade"))
        .unwrap();

    assert!(matches!(
        controller.set_target_position(1, 50.0, 0),
        Err(PlatformError::ResourceUnavailable)
    ));
    assert!(commands(&controller).is_empty());

    // State queries still answer; the system did not crash.
    assert_eq!(controller.current_position(1), Some(0.0));
}

#[test]
fn accessory_full_open_converges() {
    let mut controller = controller(&[1]);
    controller.set_target_position(1, 100.0, 0).unwrap();

    run_ticks(&mut controller, 0, 13_000, 50);

    assert_eq!(controller.current_position(1), Some(100.0));
    let sent = commands(&controller);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, Command::Raise);
}

#[test]
fn accessory_mid_range_stop() {
    let mut controller = controller(&[1]);
    controller.set_target_position(1, 50.0, 0).unwrap();

    run_ticks(&mut controller, 0, 8_000, 50);

    assert_eq!(controller.current_position(1), Some(50.0));
    let sent: Vec<Command> = commands(&controller).iter().map(|c| c.0).collect();
    assert_eq!(sent, vec![Command::Raise, Command::Stop]);
}

#[test]
fn rolling_codes_are_monotonic_across_restart() {
    let mut controller = controller(&[1]);

    // Alternate full open / full close; each leg transmits exactly one
    // frame (extreme targets get no Stop).
    for i in 0..4u64 {
        let target = if i % 2 == 0 { 100.0 } else { 0.0 };
        controller
            .set_target_position(1, target, i * 20_000)
            .unwrap();
        run_ticks(&mut controller, i * 20_000, i * 20_000 + 15_000, 50);
    }

    let sent = commands(&controller);
    assert_eq!(sent.len(), 4);
    for pair in sent.windows(2) {
        assert_eq!(pair[1].1, pair[0].1 + 1);
    }
    let last_code = sent.last().unwrap().1;

    // Simulated reboot: carry the persisted record into a fresh controller.
    let record = controller.store().record("CH-01").unwrap().to_vec();
    let mut reborn_store = MockNvs::new();
    reborn_store.save("CH-01", &record).unwrap();
    let mut controller = controller_with_store(reborn_store, &[1]);

    controller.set_target_position(1, 100.0, 0).unwrap();
    let sent = commands(&controller);
    assert_eq!(sent[0].1, last_code + 1);
}

#[test]
fn first_use_persists_default_record() {
    let controller = controller(&[1]);
    let record = controller.store().record("CH-01").unwrap();
    assert_eq!(record.len(), 10);
    // Default rolling code floor and 10 s transit times.
    assert_eq!(record[0], 0xFF);
    assert_eq!(record[1], 0x00);
}

#[test]
fn persistence_failure_is_surfaced_but_frame_goes_out() {
    let mut controller = controller(&[1]);

    controller.store_mut().fail_next_save();
    assert!(matches!(
        controller.set_target_position(1, 100.0, 0),
        Err(PlatformError::Storage(_))
    ));

    // The frame was transmitted regardless and the model is moving; only
    // the durable record is stale.
    assert_eq!(commands(&controller).len(), 1);
    run_ticks(&mut controller, 0, 13_000, 50);
    assert_eq!(controller.current_position(1), Some(100.0));
}

#[test]
fn erase_all_wipes_store() {
    let mut controller = controller(&[1, 2]);
    assert_eq!(controller.store().len(), 2);

    controller.erase_all().unwrap();
    assert!(controller.store().is_empty());
}

#[test]
fn button_panel_drives_selected_shade() {
    let mut controller = controller(&[1, 2]);
    let mut panel = ButtonPanel::new();
    let mut now: u64 = 0;

    // Short Up press: press for 100 ms, release, wait out the double window.
    let mut up_held = true;
    let press_until = 100;
    while now < 500 {
        for event in panel.poll(up_held, false, false, now) {
            let _ = controller.handle_event(event, now);
        }
        let _ = controller.tick(now);
        now += 10;
        if now >= press_until {
            up_held = false;
        }
    }

    let sent: Vec<Command> = commands(&controller).iter().map(|c| c.0).collect();
    assert_eq!(sent, vec![Command::Raise]);
    assert_eq!(controller.target_position(1), Some(100.0));
    // Channel 2 untouched.
    assert_eq!(controller.target_position(2), Some(0.0));
}

#[test]
fn program_chord_pairs_selected_shade() {
    let mut controller = controller(&[1]);

    controller
        .handle_event(
            ButtonEvent {
                button: ButtonId::Down,
                action: ButtonAction::Pressed,
            },
            0,
        )
        .unwrap();
    controller
        .handle_event(
            ButtonEvent {
                button: ButtonId::Up,
                action: ButtonAction::Pressed,
            },
            100,
        )
        .unwrap();
    controller
        .handle_event(
            ButtonEvent {
                button: ButtonId::Up,
                action: ButtonAction::Classified(PressKind::Long),
            },
            2_100,
        )
        .unwrap();

    let sent: Vec<Command> = commands(&controller).iter().map(|c| c.0).collect();
    assert_eq!(sent, vec![Command::Program]);
    // Pairing must not move the position model.
    assert_eq!(controller.current_position(1), Some(0.0));
}

#[test]
fn recalibration_via_buttons_learns_transit_time() {
    let mut controller = controller(&[1]);

    controller
        .handle_event(
            ButtonEvent {
                button: ButtonId::Up,
                action: ButtonAction::Pressed,
            },
            0,
        )
        .unwrap();
    controller
        .handle_event(
            ButtonEvent {
                button: ButtonId::Up,
                action: ButtonAction::Classified(PressKind::Long),
            },
            2_000,
        )
        .unwrap();

    run_ticks(&mut controller, 2_000, 20_000, 50);

    // The placeholder keeps the shade moving the whole time.
    controller
        .handle_event(
            ButtonEvent {
                button: ButtonId::My,
                action: ButtonAction::Classified(PressKind::Single),
            },
            20_000,
        )
        .unwrap();

    let shade = controller.registry().by_channel(1).unwrap();
    assert!(!shade.is_recalibrating());
    assert_eq!(shade.calibration().raise_time_ms, 18_000);

    // And the learned value is durable.
    let record = controller.store().record("CH-01").unwrap();
    let raise = u32::from_le_bytes([record[2], record[3], record[4], record[5]]);
    assert_eq!(raise, 18_000);
}
