use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use multi_filter::{AudioProcess, FilterControl, FilterType, MultiFilter};

#[test]
fn every_type_switch_stays_bounded() {
    let mut filter = MultiFilter::with_sample_rate(48_000);
    let mut block = [0.0f32; 64];
    let mut phase = 0.0f32;

    for (round, &kind) in FilterType::ALL.iter().cycle().take(44).enumerate() {
        filter.select(kind);
        filter.set_parameters(200.0 + 400.0 * round as f32, 4.0, 12.0);
        assert!(filter.is_cleared(), "{kind} was not cleared on selection");

        for sample in block.iter_mut() {
            phase += 0.05;
            *sample = phase.sin() * 0.8;
        }
        filter.process_block(&mut block);
        assert!(
            block.iter().all(|y| y.is_finite() && y.abs() < 16.0),
            "{kind} blew up after a switch"
        );
    }
}

#[test]
fn selecting_by_name_and_index_agree() {
    let mut by_name = MultiFilter::new();
    let mut by_index = MultiFilter::new();

    for (index, name) in MultiFilter::type_catalog().iter().enumerate() {
        assert!(by_name.set_type(name));
        assert_eq!(by_index.set_type_index(index), Ok(by_name.filter_type()));
        assert_eq!(by_name.filter_type().name(), *name);
    }

    assert!(!by_name.set_type("Comb"));
    assert_eq!(by_name.filter_type(), FilterType::Bs12);
}

#[test]
fn handle_switches_reach_the_audio_side() {
    let mut filter = MultiFilter::new();
    let handle = filter.handle();

    filter.process_sample(1.0);
    assert!(handle.set_type("HP12"));
    handle.set_parameters(5_000.0, 0.707, 0.0);

    // Switch lands on the next sample
    filter.process_sample(0.0);
    assert_eq!(filter.active().filter_type(), FilterType::Hp12);
    assert_eq!(filter.parameters().frequency, 5_000.0);
}

#[test]
fn concurrent_control_never_corrupts_audio() {
    let mut filter = MultiFilter::with_sample_rate(44_100);
    let handle = filter.handle();
    let running = Arc::new(AtomicBool::new(true));

    let control = {
        let running = running.clone();
        thread::spawn(move || {
            let mut step = 0usize;
            while running.load(Ordering::Relaxed) {
                let kind = FilterType::ALL[step % FilterType::ALL.len()];
                handle.select(kind);
                handle.set_parameters(
                    50.0 + (step % 200) as f32 * 90.0,
                    0.5 + (step % 7) as f32,
                    (step % 25) as f32 - 12.0,
                );
                step += 1;
            }
            step
        })
    };

    let mut block = [0.0f32; 128];
    for round in 0..2_000 {
        for (i, sample) in block.iter_mut().enumerate() {
            *sample = if (round + i) % 32 == 0 { 0.9 } else { -0.1 };
        }
        filter.process_block(&mut block);
        assert!(block.iter().all(|y| y.is_finite()));
    }

    running.store(false, Ordering::Relaxed);
    let steps = control.join().unwrap();
    assert!(steps > 0);
}
