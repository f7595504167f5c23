//! Roku External Control Protocol (ECP) key names used by TCL Roku TVs.
//!
//! Roku has no dedicated pause key: `Play` toggles play/pause.  `stop` is
//! approximated with `InstantReplay`.

/// Translates an abstract command to a Roku ECP key name.
pub fn to_native(command: &str) -> Option<&'static str> {
    let key = match command {
        "up" => "Up",
        "down" => "Down",
        "left" => "Left",
        "right" => "Right",
        "enter" => "Select",
        "back" => "Back",
        "home" => "Home",
        "play" | "pause" => "Play",
        "stop" => "InstantReplay",
        "rewind" => "Rev",
        "forward" => "Fwd",
        "volume_up" => "VolumeUp",
        "volume_down" => "VolumeDown",
        "mute" => "VolumeMute",
        "channel_up" => "ChannelUp",
        "channel_down" => "ChannelDown",
        "0" => "Lit_0",
        "1" => "Lit_1",
        "2" => "Lit_2",
        "3" => "Lit_3",
        "4" => "Lit_4",
        "5" => "Lit_5",
        "6" => "Lit_6",
        "7" => "Lit_7",
        "8" => "Lit_8",
        "9" => "Lit_9",
        "power" => "PowerOff",
        "info" => "Info",
        _ => return None,
    };
    Some(key)
}
