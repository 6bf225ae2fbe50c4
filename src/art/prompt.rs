use super::ArtStyle;

// Matched case-insensitively anywhere in the prompt
const CAT_KEYWORDS: [&str; 6] = ["cat", "猫", "ねこ", "kitten", "子猫", "feline"];

pub fn is_cat_prompt(prompt: &str) -> bool {
    let lower = prompt.to_lowercase();
    CAT_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Expands a short user prompt into a full art brief tuned for placement inside a QR badge.
pub fn art_prompt(user_prompt: &str, style: ArtStyle) -> String {
    let style_line = match style.modifier() {
        "" => "Style: vibrant, colourful digital art with rich detail".to_string(),
        m => format!("Style: {m}"),
    };

    if is_cat_prompt(user_prompt) {
        return format!(
            "A vibrant digital artwork of two or three playful cats, composed for the centre of a \
             circular QR code badge.\n\
             \n\
             {style_line}\n\
             - Cats in lively poses (jumping, chasing, curled up together) with distinct markings \
             such as tabby stripes, calico patches or tuxedo coats\n\
             - Bright expressive eyes and soft fluffy fur with gentle lighting\n\
             - Palette of turquoise (#40E0D0), coral (#FF7F50), pink (#FF69B4), gold (#FFD700) \
             and lime (#32CD32) with smooth gradients\n\
             - Soft bokeh, sparkles and simple geometric shapes in the background\n\
             - Subjects concentrated in the centre, calmer detail toward the edges\n\
             - Square 1024x1024 output, crisp and saturated"
        );
    }

    format!(
        "A vibrant, colourful artwork of \"{user_prompt}\", composed for the centre of a circular \
         QR code badge.\n\
         \n\
         {style_line}\n\
         - \"{user_prompt}\" as the main subject with plenty of detail and personality\n\
         - Palette of cyan, orange, pink, golden yellow and emerald green with smooth gradients\n\
         - Dynamic lighting, soft bokeh and whimsical touches that fit the theme\n\
         - Balanced composition with the subject in the centre\n\
         - Square 1024x1024 output, crisp and saturated"
    )
}
