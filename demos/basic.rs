//! Standalone demo: opens a window with a center-origin slider.

use floem::prelude::*;
use floem::window::WindowConfig;
use floem_center_slider::{center_slider, SliderRange, TrackColor};

fn demo_view(value: RwSignal<f32>) -> impl IntoView {
    let range = SliderRange::new(-100.0, 100.0).unwrap();
    let accent = TrackColor::from_hex("#3B82F6").unwrap_or(TrackColor::BLACK);
    v_stack((
        center_slider(value, range)
            .track_height(3.0)
            .minimum_track_foreground_color(accent)
            .maximum_track_foreground_color(TrackColor::from_rgb(239, 68, 68))
            .feedback(|| log::info!("center pulse"))
            .style(|s| s.width_full()),
        h_stack((
            label(move || format!("{:.1}", value.get())),
            label(|| "Center".to_string())
                .style(|s| s.padding(4.0).border(1.0).border_radius(3.0))
                .on_click_stop(move |_| value.set(0.0)),
        ))
        .style(|s| s.gap(12.0).items_center()),
    ))
    .style(|s| s.padding(16.0).gap(12.0).width_full())
}

fn main() {
    env_logger::init();

    let value = RwSignal::new(0.0_f32);

    floem::Application::new()
        .window(
            move |_| {
                demo_view(value).on_event_stop(floem::event::EventListener::WindowClosed, |_| {
                    floem::quit_app()
                })
            },
            Some(
                WindowConfig::default()
                    .size((320.0, 140.0))
                    .title("floem-center-slider"),
            ),
        )
        .run();
}
