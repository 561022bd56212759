//! Built-in vocabularies. Order matters: the first matching entry wins, so a
//! specific name always sits above any entry whose pattern it contains.

/// `(patterns, model id)`. Point releases precede their parent family.
pub(crate) const BUILTIN_MODEL_RULES: &[(&[&str], &str)] = &[
    (&["qwen3.5", "qwen35", "qwen-3.5"], "qwen3.5-35b-a3b"),
    (&["gpt-5.3", "gpt53", "gpt-53"], "gpt-5.3-codex"),
    (&["opus-4.6", "opus-4-6", "opus46"], "claude-opus-4.6"),
    (&["sonnet-4.6", "sonnet-4-6", "sonnet46"], "claude-sonnet-4.6"),
    (&["gemini-3.1", "gemini31"], "gemini-3.1-pro"),
    (&["qwen3", "qwen"], "qwen3-coder-next"),
    (&["gpt-5.2", "gpt52", "codex"], "gpt-5.2-codex"),
    (&["kimi"], "kimi-k2.5"),
    (&["opus"], "claude-opus-4.5"),
    (&["sonnet"], "claude-sonnet-4.5"),
    (&["haiku"], "claude-haiku-4.5"),
    (&["gemini"], "gemini-3-pro"),
    (&["glm"], "glm-4.7"),
];

/// `runecrafting` must be tested before `crafting`.
pub(crate) const SKILLS: &[&str] = &[
    "runecrafting",
    "woodcutting",
    "firemaking",
    "fletching",
    "fishing",
    "cooking",
    "mining",
    "smithing",
    "crafting",
    "herblore",
    "agility",
    "thieving",
    "slayer",
    "farming",
    "construction",
    "hunter",
    "attack",
    "strength",
    "defence",
    "ranged",
    "prayer",
    "magic",
    "hitpoints",
];

pub(crate) const TOTAL_LEVEL_PATTERNS: &[&str] = &["total-level", "total_level", "totallevel"];

pub(crate) const GOLD_PATTERNS: &[&str] = &["gold"];
