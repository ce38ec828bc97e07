use cr2_core::Sensor;

use crate::error::{Error, Result};

/// Builds `Sensor` geometry from a decoded Canon `SensorInfo` (maker-note
/// tag `0x00E0`) array. Field positions follow the index mapping in
/// spec section 3/4.1: width=[1], height=[2], left=[5], top=[6],
/// right=[7], bottom=[8], black-mask borders=[9..=12]. The fourth
/// black-mask border (bottom, index 12) isn't named explicitly by the
/// spec's "[9..12]" shorthand but is present in the Canon SensorInfo
/// layout (confirmed against the namedtuple field order this was
/// distilled from) and the spec's data model calls for all four.
///
/// Grounded on the per-field signed-16-array extraction pattern used for
/// Canon's other maker-note sub-tags (CameraSettings, FocalLength,
/// ShotInfo, AFInfo): read the whole array in file byte order, then index
/// into it by documented position.
pub fn sensor_from_sensor_info(values: &[i16]) -> Result<Sensor> {
    if values.len() < 13 {
        return Err(Error::MalformedSensorInfo);
    }
    let at = |i: usize| values[i] as u32;
    Ok(Sensor {
        width: at(1),
        height: at(2),
        left: at(5),
        top: at(6),
        right: at(7),
        bottom: at(8),
        black_left: at(9),
        black_top: at(10),
        black_right: at(11),
        black_bottom: at(12),
    })
}
