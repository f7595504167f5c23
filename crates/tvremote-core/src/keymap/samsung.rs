//! Samsung Tizen remote key codes (`KEY_*`), as accepted by the
//! `ms.remote.control` WebSocket method.

/// Translates an abstract command to a Samsung key code.
pub fn to_native(command: &str) -> Option<&'static str> {
    let key = match command {
        "power" => "KEY_POWER",
        "power_off" => "KEY_POWEROFF",
        "volume_up" => "KEY_VOLUP",
        "volume_down" => "KEY_VOLDOWN",
        "mute" => "KEY_MUTE",
        "channel_up" => "KEY_CHUP",
        "channel_down" => "KEY_CHDOWN",
        "up" => "KEY_UP",
        "down" => "KEY_DOWN",
        "left" => "KEY_LEFT",
        "right" => "KEY_RIGHT",
        "enter" => "KEY_ENTER",
        "home" => "KEY_HOME",
        "back" => "KEY_RETURN",
        "menu" => "KEY_MENU",
        "source" => "KEY_SOURCE",
        "tools" => "KEY_TOOLS",
        "info" => "KEY_INFO",
        "play" => "KEY_PLAY",
        "pause" => "KEY_PAUSE",
        "stop" => "KEY_STOP",
        "rewind" => "KEY_REWIND",
        "forward" => "KEY_FF",
        "0" => "KEY_0",
        "1" => "KEY_1",
        "2" => "KEY_2",
        "3" => "KEY_3",
        "4" => "KEY_4",
        "5" => "KEY_5",
        "6" => "KEY_6",
        "7" => "KEY_7",
        "8" => "KEY_8",
        "9" => "KEY_9",
        _ => return None,
    };
    Some(key)
}
