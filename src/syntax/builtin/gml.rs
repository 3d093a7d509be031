//! GML (Game Maker Language) mode

use crate::error::RuleError;
use crate::syntax::language::LanguageMode;
use crate::syntax::rules::{BlockSpec, RuleSet};
use crate::syntax::style::{Style, StyleProfiles, StyleTable};

pub const HEX_LITERAL: &str = "HEX_LITERAL";
pub const NUMERIC_LITERAL: &str = "NUMERIC_LITERAL";
pub const SINGLEQ_STRING: &str = "SINGLEQ_STRING";
pub const DOUBLEQ_STRING: &str = "DOUBLEQ_STRING";
pub const LINE_COMMENT: &str = "LINE_COMMENT";
pub const DOC_LINE_COMMENT: &str = "FORMAL_LINE_COMMENT";
pub const BLOCK_COMMENT: &str = "BLOCK_COMMENT";
pub const DOC_COMMENT: &str = "FORMAL_COMMENT";
pub const VARIABLES: &str = "VARIABLES";
pub const CONSTANTS: &str = "CONSTANTS";
pub const OPERATORS: &str = "OPERATORS";
pub const CONSTRUCTS: &str = "CONSTRUCTS";
pub const FUNCTIONS: &str = "FUNCTIONS";
pub const OPS_AND_SEPS: &str = "OPS_AND_SEPS";

const FUNCTION_WORDS: &[&str] = &[
    "abs", "arccos", "arcsin", "arctan", "arctan2", "audio_play_sound", "audio_stop_sound",
    "ceil", "choose", "chr", "clamp", "cos", "degtorad", "distance_to_object",
    "distance_to_point", "draw_circle", "draw_line", "draw_rectangle", "draw_self",
    "draw_set_alpha", "draw_set_color", "draw_set_font", "draw_set_halign", "draw_set_valign",
    "draw_sprite", "draw_sprite_ext", "draw_text", "ds_list_add", "ds_list_create",
    "ds_list_destroy", "ds_list_find_value", "ds_list_size", "ds_map_add", "ds_map_create",
    "ds_map_destroy", "ds_map_find_value", "exp", "file_text_close", "file_text_open_read",
    "file_text_read_string", "floor", "frac", "game_end", "game_restart", "instance_create",
    "instance_destroy", "instance_exists", "instance_find", "instance_nearest",
    "instance_number", "irandom", "irandom_range", "keyboard_check", "keyboard_check_pressed",
    "keyboard_check_released", "lengthdir_x", "lengthdir_y", "ln", "max", "mean", "median",
    "min", "motion_add", "motion_set", "mouse_check_button", "mouse_check_button_pressed",
    "move_bounce_all", "move_towards_point", "ord", "place_free", "place_meeting",
    "point_direction", "point_distance", "position_meeting", "power", "radtodeg", "random",
    "random_range", "randomize", "real", "room_goto", "room_goto_next", "room_restart",
    "round", "script_execute", "show_debug_message", "show_message", "sign", "sin",
    "sound_play", "sqr", "sqrt", "string", "string_copy", "string_delete", "string_insert",
    "string_length", "string_lower", "string_pos", "string_replace", "string_upper", "tan",
];

const CONSTRUCT_WORDS: &[&str] = &[
    "begin", "break", "case", "continue", "default", "do", "else", "end", "exit", "for",
    "globalvar", "if", "repeat", "return", "switch", "then", "until", "var", "while", "with",
];

const OPERATOR_WORDS: &[&str] = &["and", "div", "mod", "not", "or", "xor"];

const CONSTANT_WORDS: &[&str] = &[
    "all", "c_aqua", "c_black", "c_blue", "c_dkgray", "c_fuchsia", "c_gray", "c_green",
    "c_lime", "c_ltgray", "c_maroon", "c_navy", "c_olive", "c_orange", "c_purple", "c_red",
    "c_silver", "c_teal", "c_white", "c_yellow", "fa_bottom", "fa_center", "fa_left",
    "fa_middle", "fa_right", "fa_top", "false", "global", "local", "mb_any", "mb_left",
    "mb_middle", "mb_none", "mb_right", "noone", "other", "pi", "self", "true", "vk_alt",
    "vk_anykey", "vk_control", "vk_down", "vk_enter", "vk_escape", "vk_left", "vk_nokey",
    "vk_right", "vk_shift", "vk_space", "vk_up",
];

const VARIABLE_WORDS: &[&str] = &[
    "alarm", "current_time", "depth", "direction", "fps", "friction", "gravity",
    "gravity_direction", "health", "hspeed", "id", "image_alpha", "image_angle",
    "image_blend", "image_index", "image_speed", "image_xscale", "image_yscale",
    "keyboard_key", "keyboard_lastkey", "keyboard_string", "lives", "mask_index", "mouse_x",
    "mouse_y", "object_index", "persistent", "room", "room_height", "room_speed",
    "room_width", "score", "solid", "speed", "sprite_index", "view_xview", "view_yview",
    "visible", "vspeed", "x", "xprevious", "xstart", "y", "yprevious", "ystart",
];

/// Sample document exercising tabs, strings and multi-line comments
pub const DEMO_TEXT: &str = "Hello, world
Mystical second line what can't' be edited
\tTab test line 1
\tTab test line 2
\tTab test line 3
End tab test line
derp\tCascading tab test
der\tCascading tab test
de\tCascading tab test
d\tCascading tab test
if (a = \"It's hard to think\")
  then b = c + 10; // That after all this time
else /* Everything is finally working.
        *wipes tear* */
  d = e * 20;
/** Okay, so there are probably
    some bugs to work out, but you
    have to admit... It looks nice. */
";

/// Build the GML rule set
pub fn gml_rules() -> Result<RuleSet, RuleError> {
    RuleSet::builder()
        // Doc forms first: they share a prefix with the plain forms
        .block(BlockSpec::new(DOC_COMMENT, r"/\*").followed_by(r"\*").until(r"\*/"))
        // Only the slash is consumed, so the star can also close: `/*/`
        .block(BlockSpec::new(BLOCK_COMMENT, "/").followed_by(r"\*").until(r"\*/"))
        .block(BlockSpec::new(DOC_LINE_COMMENT, "///"))
        .block(BlockSpec::new(LINE_COMMENT, "//"))
        .block(BlockSpec::new(DOUBLEQ_STRING, "\"").until("\""))
        .block(BlockSpec::new(SINGLEQ_STRING, "'").until("'"))
        .keywords(FUNCTIONS, FUNCTION_WORDS.iter().copied())
        .keywords(CONSTRUCTS, CONSTRUCT_WORDS.iter().copied())
        .keywords(OPERATORS, OPERATOR_WORDS.iter().copied())
        .keywords(CONSTANTS, CONSTANT_WORDS.iter().copied())
        .keywords(VARIABLES, VARIABLE_WORDS.iter().copied())
        .symbols(OPS_AND_SEPS, "{[()]}!%^&*-/+=?:~<>.,;")
        .pattern(NUMERIC_LITERAL, "[0-9]+")
        .pattern(HEX_LITERAL, r"\$[0-9A-Fa-f]+")
        .build()
}

/// Default scheme
fn advanced_profile() -> StyleTable {
    let navy = Style::rgb(0, 0, 200);
    let blue_black = Style::rgb(0, 0, 100);
    let steel_blue = Style::rgb(54, 116, 186);
    let forest = Style::rgb(13, 135, 13);
    let dark_red = Style::rgb(150, 0, 0);

    StyleTable::new("Advanced")
        .with(DOC_COMMENT, steel_blue.with_bold())
        .with(BLOCK_COMMENT, forest.with_italic())
        .with(DOC_LINE_COMMENT, steel_blue.with_bold())
        .with(LINE_COMMENT, forest.with_italic())
        .with(DOUBLEQ_STRING, blue_black)
        .with(SINGLEQ_STRING, blue_black)
        .with(FUNCTIONS, Style::rgb(0, 100, 150))
        .with(CONSTRUCTS, navy)
        .with(OPERATORS, navy)
        .with(CONSTANTS, dark_red)
        .with(VARIABLES, blue_black.with_italic())
        .with(OPS_AND_SEPS, navy)
        .with(NUMERIC_LITERAL, dark_red)
        .with(HEX_LITERAL, Style::rgb(100, 100, 255))
}

fn code_blocks_profile() -> StyleTable {
    let navy = Style::rgb(0, 0, 200);
    let blue = Style::rgb(0, 0, 255);
    let light_blue = Style::rgb(100, 100, 255);
    let green = Style::rgb(13, 165, 13);

    StyleTable::new("Code::Blocks")
        .with(DOC_COMMENT, light_blue.with_bold())
        .with(BLOCK_COMMENT, green.with_italic())
        .with(DOC_LINE_COMMENT, light_blue.with_bold())
        .with(LINE_COMMENT, green.with_italic())
        .with(DOUBLEQ_STRING, blue)
        .with(SINGLEQ_STRING, blue)
        .with(FUNCTIONS, navy)
        .with(CONSTRUCTS, navy.with_bold())
        .with(OPERATORS, navy.with_bold())
        .with(CONSTANTS, Style::rgb(150, 0, 0))
        .with(VARIABLES, blue.with_italic())
        .with(OPS_AND_SEPS, Style::rgb(255, 0, 0))
        .with(NUMERIC_LITERAL, Style::rgb(255, 0, 255))
        .with(HEX_LITERAL, Style::rgb(255, 100, 100))
}

/// Create the GML language mode
pub fn gml_mode() -> Result<LanguageMode, RuleError> {
    let mut profiles = StyleProfiles::new(advanced_profile());
    profiles.register(code_blocks_profile());
    Ok(LanguageMode::new("GML", gml_rules()?, profiles).with_extensions(&["gml"]))
}
