//! JNI bindings for the Android app.
//!
//! Each public function here corresponds to a `external fun` declaration
//! in NavBridge.kt. The function names follow JNI naming conventions:
//! Java_<package>_<class>_<method> with dots replaced by underscores.
//!
//! Fallible calls log the error and return `null` to Kotlin.

use jni::JNIEnv;
use jni::objects::{JByteArray, JClass, JString};
use jni::sys::{jdouble, jstring};

/// Returns the library version.
/// Maps to: NavBridge.version() -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_turnnav_app_NavBridge_version(
    env: JNIEnv,
    _class: JClass,
) -> jstring {
    to_jstring(&env, crate::VERSION.to_string())
}

/// Installs the Android log backend. Safe to call more than once.
/// Maps to: NavBridge.init()
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_turnnav_app_NavBridge_init(_env: JNIEnv, _class: JClass) {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("turnnav"),
    );
    log::info!("turnnav {} initialized", crate::VERSION);
}

/// Locates a position on a JSON instruction list.
/// Maps to: NavBridge.locate(instructionsJson: String, lat: Double, lon: Double) -> String?
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_turnnav_app_NavBridge_locate<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    instructions_json: JString<'local>,
    lat: jdouble,
    lon: jdouble,
) -> jstring {
    let result = env
        .get_string(&instructions_json)
        .map_err(|e| format!("JNI string error: {e}"))
        .and_then(|json| crate::nav::locate_json(&String::from(json), lat, lon));
    result_to_jstring(&env, result)
}

/// Builds a navigable instruction list from GPX bytes.
/// Maps to: NavBridge.loadGpxRoute(data: ByteArray, speedMps: Double) -> String?
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_turnnav_app_NavBridge_loadGpxRoute<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    data: JByteArray<'local>,
    speed_mps: jdouble,
) -> jstring {
    let result = env
        .convert_byte_array(&data)
        .map_err(|e| format!("JNI byte array error: {e}"))
        .and_then(|bytes| crate::gpx::parse_route_to_json(&bytes, speed_mps));
    result_to_jstring(&env, result)
}

fn result_to_jstring(env: &JNIEnv, result: Result<String, String>) -> jstring {
    match result {
        Ok(json) => to_jstring(env, json),
        Err(e) => {
            log::warn!("{e}");
            std::ptr::null_mut()
        }
    }
}

fn to_jstring(env: &JNIEnv, value: String) -> jstring {
    match env.new_string(value) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            log::error!("failed to create Java string: {e}");
            std::ptr::null_mut()
        }
    }
}
