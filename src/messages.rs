//! Alarm and information messages shown by the multi-function display.
//!
//! Indexed by `byte_index * 8 + bit_index` within the car status 2 alarm
//! block. Byte 9 of that block carries the index of the message currently on
//! screen instead of flags, so its eight entries are empty.

pub const MESSAGE_COUNT: usize = 128;

pub static MESSAGES: [&str; MESSAGE_COUNT] = [
    // byte 0
    "Tyre pressure too low",
    "",
    "Automatic gearbox temperature too high",
    "Brake fluid level low",
    "Hydraulic suspension pressure defective",
    "Suspension defective",
    "Engine oil temperature too high",
    "Engine temperature too high",
    // byte 1
    "Clear diesel filter (FAP) urgently",
    "",
    "Min level additive gasoil",
    "Fuel cap open",
    "Puncture(s) detected",
    "Cooling circuit level too low",
    "Oil pressure insufficient",
    "Engine oil level too low",
    // byte 2
    "Engine antipollution system defective",
    "Brake pads worn",
    "Check control OK",
    "Automatic gearbox defective",
    "ASR / ESP system defective",
    "ABS brake system defective",
    "Suspension and power steering defective",
    "Brake system defective",
    // byte 3
    "Airbag defective",
    "Airbag defective",
    "",
    "Engine temperature high",
    "",
    "",
    "",
    "Water in Diesel fuel filter",
    // byte 4
    "",
    "Automatic beam adjustment defective",
    "",
    "",
    "Service battery charge low",
    "Battery charge low",
    "Diesel antipollution system (FAP) defective",
    "Engine antipollution system inoperative",
    // byte 5
    "Handbrake on",
    "Safety belt not fastened",
    "Passenger airbag neutralized",
    "Windshield liquid level too low",
    "Current speed too high",
    "Ignition key still inserted",
    "Lights not on",
    "",
    // byte 6
    "Driver door open",
    "Passenger door open",
    "Rear left door open",
    "Rear right door open",
    "Boot open",
    "Bonnet open",
    "Rear window open",
    "Fuel tank cap open",
    // byte 7
    "Left rear tyre punctured",
    "Right rear tyre punctured",
    "Right front tyre punctured",
    "Left front tyre punctured",
    "Left rear tyre pressure low",
    "Right rear tyre pressure low",
    "Right front tyre pressure low",
    "Left front tyre pressure low",
    // byte 8
    "Diesel fuel filter clogged",
    "Tyre pressure sensor(s) missing",
    "Tyre pressure monitoring deactivated",
    "Tyre pressure monitoring defective",
    "Left stick button pressed",
    "Automatic headlamp lighting deactivated",
    "Automatic windscreen wipers deactivated",
    "Automatic door locking deactivated",
    // byte 9: displayed message index
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    // byte 10
    "Automatic windscreen wipers activated",
    "Automatic headlamp lighting activated",
    "Automatic door locking activated",
    "Child safety activated",
    "Child safety deactivated",
    "Parking assistance deactivated",
    "Parking assistance activated",
    "ESP/ASR deactivated",
    // byte 11
    "Dead-locking activated",
    "Key battery low",
    "Range below 50 km",
    "Level of fuel low",
    "",
    "",
    "",
    "",
    // byte 12
    "Engine fault: repair vehicle",
    "Engine fault: stop vehicle",
    "Particle filter full: please consult handbook",
    "",
    "",
    "",
    "",
    "",
    // byte 13
    "Doors locked",
    "Doors unlocked",
    "Speed limit exceeded",
    "Cruise control speed stored",
    "Cruise control deactivated",
    "",
    "",
    "",
    // byte 14
    "Risk of ice",
    "Sidelights on",
    "",
    "",
    "",
    "",
    "",
    "",
    // byte 15
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
];

/// Message text for `index`, `None` for unassigned entries and out-of-range
/// indices.
pub fn message(index: u8) -> Option<&'static str> {
    MESSAGES
        .get(index as usize)
        .copied()
        .filter(|m| !m.is_empty())
}
