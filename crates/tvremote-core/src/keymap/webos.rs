//! LG WebOS key names for `ssap://com.webos.service.ime/sendEnterKey`.

/// Translates an abstract command to a WebOS key name.
pub fn to_native(command: &str) -> Option<&'static str> {
    let key = match command {
        "up" => "UP",
        "down" => "DOWN",
        "left" => "LEFT",
        "right" => "RIGHT",
        "enter" => "ENTER",
        "back" => "BACK",
        "home" => "HOME",
        "play" => "PLAY",
        "pause" => "PAUSE",
        "stop" => "STOP",
        "rewind" => "REWIND",
        "forward" => "FASTFORWARD",
        "volume_up" => "VOLUMEUP",
        "volume_down" => "VOLUMEDOWN",
        "mute" => "MUTE",
        "channel_up" => "CHANNELUP",
        "channel_down" => "CHANNELDOWN",
        "0" => "0",
        "1" => "1",
        "2" => "2",
        "3" => "3",
        "4" => "4",
        "5" => "5",
        "6" => "6",
        "7" => "7",
        "8" => "8",
        "9" => "9",
        "power" => "POWER",
        "menu" => "MENU",
        "info" => "INFO",
        _ => return None,
    };
    Some(key)
}
