//! Display demo application
//!
//! Opens the single display window through GLFW, echoes keyboard input and
//! prints every controller event until the window is closed or Escape is
//! pressed. Space toggles fullscreen, R toggles resizability.

use legacy_display::foundation::logging;
use legacy_display::prelude::*;

const CONFIG_PATH: &str = "display_demo.toml";

fn drain_keyboard(display: &mut Display<GlfwWindowSystem>) -> Vec<i32> {
    let mut pressed = Vec::new();
    let keyboard = display.keyboard();
    while keyboard.next() {
        let Some(event) = keyboard.event() else { continue };
        match event.character {
            Some(c) => log::info!("Typed '{c}'"),
            None if event.pressed => pressed.push(event.key),
            None => {}
        }
    }
    pressed
}

fn drain_controllers(controllers: &mut Controllers<GlfwJoysticks>) -> Result<(), ControllerError> {
    controllers.poll();
    while controllers.next() {
        let source = controllers.get_event_source()?.name().to_string();
        let control = controllers.get_event_control_index()?;
        if controllers.is_event_button()? {
            log::info!("{source}: button {control} -> {}", controllers.get_event_button_state()?);
        } else {
            log::info!(
                "{source}: control {control} = {:.3} (x {:.3}, y {:.3})",
                controllers.get_event_value()?,
                controllers.get_event_x_axis_value()?,
                controllers.get_event_y_axis_value()?
            );
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CompatConfig::load_or_default(CONFIG_PATH)?;
    config.validate()?;
    logging::init_with_level(&config.log_level);

    let system = GlfwWindowSystem::new()?;
    let mut controllers =
        Controllers::with_dead_zone(GlfwJoysticks::new(system.glfw()), config.controllers.default_dead_zone);

    let mut display = Display::new(system, config.display.clone())?;
    display.set_title("Legacy Display Demo");
    display.set_display_mode(DisplayMode::new(800, 600))?;
    display.create(PixelFormat::new().with_depth_bits(24), None)?;

    if let Err(e) = controllers.create() {
        log::warn!("Controllers unavailable: {e}");
    }
    log::info!("{} controller(s) found", controllers.get_controller_count());

    while !display.is_close_requested() {
        display.update(true)?;

        for key in drain_keyboard(&mut display) {
            if key == glfw::Key::Escape as i32 {
                log::info!("Escape pressed, exiting");
                return Ok(());
            }
            if key == glfw::Key::Space as i32 {
                let mode = if display.is_fullscreen() {
                    DisplayMode::new(800, 600)
                } else {
                    display.get_desktop_display_mode()
                };
                display.set_display_mode_and_fullscreen(mode)?;
            }
            if key == glfw::Key::R as i32 {
                let resizable = !display.is_resizable();
                display.set_resizable(resizable)?;
            }
        }

        if display.was_resized() {
            log::info!("Resized to {}x{}", display.width(), display.height());
        }

        if controllers.is_created() {
            drain_controllers(&mut controllers)?;
        }

        display.sync(60);
    }

    log::info!("Window closed");
    Ok(())
}
