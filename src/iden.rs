//! Known 12-bit identifiers.

pub const COM2000_IDEN: u16 = 0x450;
pub const AIRCON1_IDEN: u16 = 0x464;
pub const AUDIO_SETTINGS_IDEN: u16 = 0x4D4;
pub const AIRCON2_IDEN: u16 = 0x4DC;
pub const CDCHANGER_IDEN: u16 = 0x4EC;
pub const LIGHTS_STATUS_IDEN: u16 = 0x4FC;
pub const CAR_STATUS2_IDEN: u16 = 0x524;
pub const SATNAV_STATUS_1_IDEN: u16 = 0x54E;
pub const HEAD_UNIT_IDEN: u16 = 0x554;
pub const CAR_STATUS1_IDEN: u16 = 0x564;
pub const MFD_STATUS_IDEN: u16 = 0x5E4;
pub const SATNAV_GUIDANCE_IDEN: u16 = 0x64E;
pub const DASHBOARD_BUTTONS_IDEN: u16 = 0x664;
pub const SATNAV_REPORT_IDEN: u16 = 0x6CE;
pub const SATNAV_DOWNLOADING_IDEN: u16 = 0x6F4;
pub const WHEEL_SPEED_IDEN: u16 = 0x744;
pub const SATNAV_TO_MFD_IDEN: u16 = 0x74E;
pub const SATNAV_STATUS_2_IDEN: u16 = 0x7CE;
pub const DASHBOARD_IDEN: u16 = 0x824;
pub const ENGINE_IDEN: u16 = 0x8A4;
pub const DEVICE_REPORT_IDEN: u16 = 0x8C4;
pub const SATNAV_STATUS_3_IDEN: u16 = 0x8CE;
pub const MFD_TO_HEAD_UNIT_IDEN: u16 = 0x8D4;
pub const CDCHANGER_COMMAND_IDEN: u16 = 0x8EC;
pub const ODOMETER_IDEN: u16 = 0x8FC;
pub const MFD_TO_SATNAV_IDEN: u16 = 0x94E;
pub const TIME_IDEN: u16 = 0x984;
pub const HEAD_UNIT_STALK_IDEN: u16 = 0x9C4;
pub const SATNAV_GUIDANCE_DATA_IDEN: u16 = 0x9CE;
pub const AIRCON_DIAG_COMMAND_IDEN: u16 = 0xA5C;
pub const AIRCON_DIAG_IDEN: u16 = 0xADC;
pub const ECU_IDEN: u16 = 0xB0E;
pub const VIN_IDEN: u16 = 0xE24;
