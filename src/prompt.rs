//! The instruction we send to the model.

/// How many recommendations the model is asked for. The parser doesn't
/// enforce this, it renders whatever comes back well-formed.
pub const REQUESTED_ITEMS: usize = 5;

/// Build the prompt for a description of the person we're shopping for.
///
/// Empty descriptions are rejected before this is called, so every input is
/// accepted here as-is.
pub fn build_prompt(description: &str) -> String {
    format!(
        r#"
Suggest {REQUESTED_ITEMS} specific, physical products available on Amazon for this person: '{description}'.

---

## CRITICAL OUTPUT INSTRUCTIONS:
1.  **DO NOT use any introduction, conversation, code fences (```), numbering, or extra characters.**
2.  **ONLY** return the raw data string.
3.  **Output Format MUST be EXACTLY:** Name || Description | Name || Description | ...
4.  Return exactly {REQUESTED_ITEMS} items.
5.  Example Format: Studio Microphone || Clear, crisp audio for beginner podcasters | Boom Arm Stand || Keeps the mic off the desk to reduce vibrations | USB Audio Interface || Essential to connect professional mics for pristine sound | ...
"#
    )
}
