pub mod runner;

pub use orrery;
pub use runner::AppRunner;

/// Generate all `#[wasm_bindgen]` exports for a visualizer.
///
/// Generates:
/// - `thread_local!` storage for the AppRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (app_init, app_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod app;
/// use app::MySystem;
///
/// orrery_web::export_visualizer!(MySystem, "my-system");
/// ```
///
/// # Arguments
///
/// - `$app_type`: The visualizer type that implements `orrery::Visualizer` and has `new()`
/// - `$app_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_visualizer {
    ($app_type:ty, $app_name:literal) => {
        use std::cell::RefCell;
        use $crate::orrery::InputEvent;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::AppRunner<$app_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::AppRunner<$app_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Visualizer not initialized. Call app_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn app_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let app = <$app_type>::new();
            let runner = $crate::AppRunner::new(app);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $app_name);
        }

        #[wasm_bindgen]
        pub fn app_tick() {
            with_runner(|r| r.tick());
        }

        #[wasm_bindgen]
        pub fn app_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn app_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn app_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn app_click(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::Click { x, y }));
        }

        #[wasm_bindgen]
        pub fn app_double_click(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::DoubleClick { x, y }));
        }

        #[wasm_bindgen]
        pub fn app_wheel(delta: f32) {
            with_runner(|r| r.push_input(InputEvent::Wheel { delta }));
        }

        #[wasm_bindgen]
        pub fn app_resize(width: f32, height: f32) {
            with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
        }

        #[wasm_bindgen]
        pub fn app_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn app_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn app_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn app_load_manifest(json: &str) -> bool {
            with_runner(|r| r.load_manifest(json))
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_ptr() -> *const f32 {
            with_runner(|r| r.frame_ptr())
        }

        #[wasm_bindgen]
        pub fn get_backdrop_ptr() -> *const f32 {
            with_runner(|r| r.backdrop_ptr())
        }

        #[wasm_bindgen]
        pub fn get_backdrop_len() -> u32 {
            with_runner(|r| r.backdrop_len())
        }

        #[wasm_bindgen]
        pub fn get_orbit_rings_ptr() -> *const f32 {
            with_runner(|r| r.orbit_rings_ptr())
        }

        #[wasm_bindgen]
        pub fn get_orbit_rings_len() -> u32 {
            with_runner(|r| r.orbit_rings_len())
        }

        #[wasm_bindgen]
        pub fn get_body_count() -> u32 {
            with_runner(|r| r.body_count())
        }

        #[wasm_bindgen]
        pub fn get_body_name(index: u32) -> String {
            with_runner(|r| r.body_name(index))
        }

        #[wasm_bindgen]
        pub fn get_body_texture(index: u32) -> String {
            with_runner(|r| r.body_texture(index))
        }

        #[wasm_bindgen]
        pub fn get_selection_text() -> String {
            with_runner(|r| r.selection_text())
        }

        #[wasm_bindgen]
        pub fn is_transition_active() -> bool {
            with_runner(|r| r.is_transition_active())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }
    };
}
