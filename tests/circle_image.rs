//! End-to-end behavior of the circle image renderer through its public API.

use std::time::Duration;

use circle_image::animation::{ArcState, Phase};
use circle_image::config::MAX_BORDER_COLORS;
use circle_image::prelude::*;
use circle_image::renderer::{Brush, DrawCommand, Fill};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn renderer(config: CircleImageConfig) -> CircleImageRenderer {
    init_logging();
    let mut renderer = CircleImageRenderer::with_config(config);
    renderer.set_size(Size::new(200.0, 200.0));
    renderer.take_redraw_request();
    renderer
}

fn record(renderer: &mut CircleImageRenderer) -> PaintContext {
    let mut ctx = PaintContext::new();
    renderer.paint(&mut ctx);
    ctx
}

fn arc_angles(ctx: &PaintContext) -> Vec<(f32, f32)> {
    ctx.arcs()
        .filter_map(|command| match command {
            DrawCommand::Arc {
                start_angle,
                sweep_angle,
                ..
            } => Some((*start_angle, *sweep_angle)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_still_border_single_color_is_full_ring() {
    let mut renderer = renderer(CircleImageConfig::new().border_width(10));
    let ctx = record(&mut renderer);
    assert_eq!(arc_angles(&ctx), vec![(270.0, 360.0)]);
}

#[test]
fn test_still_border_four_colors() {
    let mut renderer = renderer(
        CircleImageConfig::new()
            .border_width(10)
            .border_colors(vec![Color::BLACK; 4]),
    );
    let ctx = record(&mut renderer);
    assert_eq!(
        arc_angles(&ctx),
        vec![(270.0, 84.0), (360.0, 84.0), (450.0, 84.0), (540.0, 84.0)]
    );
    for command in ctx.arcs() {
        let DrawCommand::Arc { oval, stroke, .. } = command else {
            unreachable!();
        };
        assert_eq!(*oval, Rect::from_ltrb(5.0, 5.0, 195.0, 195.0));
        assert_eq!(stroke.width, 10.0);
        assert_eq!(stroke.brush, Brush::Solid(Color::BLACK));
    }
}

#[test]
fn test_border_colors_truncate_and_short_circuit() {
    let mut renderer = renderer(CircleImageConfig::new().border_width(2));

    renderer.set_border_colors(vec![Color::WHITE; 80]);
    assert_eq!(renderer.border_colors().len(), MAX_BORDER_COLORS);
    assert!(renderer.take_redraw_request());

    // Same sequence after truncation
    renderer.set_border_colors(vec![Color::WHITE; 60]);
    assert!(!renderer.take_redraw_request());

    renderer.set_border_colors(Vec::new());
    assert_eq!(renderer.border_colors().len(), MAX_BORDER_COLORS);
    assert!(!renderer.take_redraw_request());
}

#[test]
fn test_starting_twice_keeps_one_timeline() {
    let mut renderer = renderer(
        CircleImageConfig::new()
            .border_width(6)
            .border_style(BorderStyle::Rotate),
    );
    assert!(renderer.is_animating());
    renderer.advance(ms(600));

    // Visible again while already running
    renderer.on_visibility_changed(false);
    renderer.on_visibility_changed(true);
    renderer.advance(ms(600));
    let restarted = renderer.animation_state();

    let mut fresh = self::renderer(
        CircleImageConfig::new()
            .border_width(6)
            .border_style(BorderStyle::Rotate),
    );
    fresh.advance(ms(600));
    assert_eq!(restarted, fresh.animation_state());

    // Toggling the style to the value it already has does nothing
    let before = renderer.animation_state();
    renderer.set_border_style(BorderStyle::Rotate);
    assert_eq!(renderer.animation_state(), before);
    renderer.advance(ms(300));
    assert!((renderer.animation_state().rotation - 270.0).abs() < 1e-3);
}

#[test]
fn test_hiding_snaps_angles_to_final_values() {
    let mut renderer = renderer(
        CircleImageConfig::new()
            .border_width(6)
            .border_style(BorderStyle::Rotate),
    );
    renderer.advance(ms(700));
    renderer.on_visibility_changed(false);

    let state = renderer.animation_state();
    assert_eq!(state.rotation, 0.0);
    assert_eq!(state.solid_sweep, 216.0);
    assert_eq!(state.dotted_sweep, 360.0);
    assert!(!renderer.advance(ms(500)));
    assert_eq!(renderer.animation_state(), state);
}

#[test]
fn test_hiding_during_breathing_snaps_to_breathing_end() {
    let mut renderer = renderer(
        CircleImageConfig::new()
            .border_width(6)
            .border_style(BorderStyle::Rotate),
    );
    let mut animation = BorderAnimation::new(renderer.config().border_timings());
    animation.start();
    animation.advance(ms(2500));
    assert_eq!(animation.solid_state(), ArcState::Running(Phase::Breathing));

    renderer.advance(ms(2500));
    renderer.on_visibility_changed(false);
    let state = renderer.animation_state();
    assert_eq!(state.solid_sweep, 36.0);
    assert_eq!(state.dotted_sweep, 108.0);
}

#[test]
fn test_rotating_border_draws_two_arcs_from_top() {
    let mut renderer = renderer(
        CircleImageConfig::new()
            .border_width(6)
            .border_style(BorderStyle::Rotate),
    );
    renderer.advance(ms(1000));
    let state = renderer.animation_state();
    let ctx = record(&mut renderer);

    assert_eq!(
        arc_angles(&ctx),
        vec![(270.0, state.solid_sweep), (270.0, state.dotted_sweep)]
    );
    assert!((state.dotted_sweep - 180.0).abs() < 1e-3);
}

#[test]
fn test_missing_image_still_draws_border() {
    let mut renderer = renderer(
        CircleImageConfig::new()
            .border_width(4)
            .circle_background_color(Color::BLACK),
    );
    renderer.set_image("/no/such/avatar.png");
    assert!(renderer.bitmap().is_none());

    let ctx = record(&mut renderer);
    assert_eq!(ctx.commands().len(), 1);
    assert!(matches!(ctx.commands()[0], DrawCommand::Arc { .. }));
}

#[test]
fn test_background_is_drawn_under_image() {
    let mut renderer = renderer(CircleImageConfig::new().circle_background_color(Color::BLACK));
    renderer.set_image(Color::WHITE);

    let ctx = record(&mut renderer);
    let fills: Vec<_> = ctx
        .commands()
        .iter()
        .map(|command| match command {
            DrawCommand::Circle {
                fill: Fill::Solid(color),
                center,
                radius,
                ..
            } => (Some(*color), *center, *radius),
            DrawCommand::Circle { center, radius, .. } => (None, *center, *radius),
            _ => panic!("unexpected command {:?}", command),
        })
        .collect();
    assert_eq!(
        fills,
        vec![
            (Some(Color::BLACK), (100.0, 100.0), 100.0),
            (None, (100.0, 100.0), 100.0),
        ]
    );
}

#[test]
fn test_unsupported_configuration_fails_loudly() {
    init_logging();
    let mut renderer = CircleImageRenderer::new();
    for fit in [ContentFit::Contain, ContentFit::Fill, ContentFit::None] {
        let err = renderer.set_content_fit(fit).unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }
    assert!(matches!(
        renderer.set_adjust_view_bounds(true),
        Err(Error::AdjustViewBoundsUnsupported)
    ));
}

#[test]
fn test_pixels_show_image_and_border() {
    let mut renderer = renderer(
        CircleImageConfig::new()
            .border_width(10)
            .border_colors(vec![Color::from_hex(0x0000FF)]),
    );
    renderer.set_image(Color::from_hex(0xFF0000));

    let mut canvas = PixmapCanvas::new(200, 200).unwrap();
    renderer.paint(&mut canvas);

    // Image center, border ring, and the corner outside the circle
    assert_eq!(canvas.pixel(100, 100).unwrap().to_rgba8(), [255, 0, 0, 255]);
    assert_eq!(canvas.pixel(100, 3).unwrap().to_rgba8(), [0, 0, 255, 255]);
    assert_eq!(canvas.pixel(2, 2).unwrap().to_rgba8()[3], 0);
}

#[test]
fn test_padding_moves_circle() {
    let mut renderer = renderer(CircleImageConfig::new());
    renderer.set_padding([0.0, 0.0, 0.0, 40.0].into());
    renderer.set_image(Color::WHITE);

    let geometry = *renderer.geometry();
    assert_eq!(geometry.bounds, Rect::new(40.0, 0.0, 160.0, 200.0));
    assert_eq!(geometry.content, Rect::new(40.0, 20.0, 160.0, 160.0));
    assert_eq!(geometry.drawable_center(), (120.0, 100.0));
}
