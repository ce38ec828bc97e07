//! INI-style configuration: a system-wide file and a user file, both
//! holding a `[CONFIG]` section that names a further section with the
//! external decoder's `exec`/`command` keys. Per spec section 6, a
//! missing or incomplete config falls back to the platform default of
//! invoking `dcraw`.

use std::path::PathBuf;

use cr2::ExternalDecoder;
use ini::Ini;

const SYSTEM_CONFIG_PATH: &str = "/etc/crtwo2fits.conf";

fn user_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config/crtwo2fits/crtwo2fits.conf"))
}

fn default_external_decoder() -> ExternalDecoder {
    ExternalDecoder {
        exec_path: "dcraw".to_string(),
        command_template: "{exec} -t 0 -j -4 -W -D -d -c {file}".to_string(),
    }
}

fn read_external_decoder(ini: &Ini) -> Option<ExternalDecoder> {
    let config = ini.section(Some("CONFIG"))?;
    let section_name = config.get("external-decoder")?;
    let decoder = ini.section(Some(section_name))?;
    Some(ExternalDecoder {
        exec_path: decoder.get("exec")?.to_string(),
        command_template: decoder.get("command")?.to_string(),
    })
}

/// Loads the external-decoder invocation, preferring the user config over
/// the system one, and falling back to the `dcraw` default when neither
/// file exists or names a complete `external-decoder` section.
pub fn load_external_decoder() -> ExternalDecoder {
    let system = Ini::load_from_file(SYSTEM_CONFIG_PATH).ok().and_then(|ini| read_external_decoder(&ini));
    let user = user_config_path()
        .and_then(|path| Ini::load_from_file(path).ok())
        .and_then(|ini| read_external_decoder(&ini));
    user.or(system).unwrap_or_else(default_external_decoder)
}
