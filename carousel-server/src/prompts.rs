//! Prompt construction and output parsing for the copy endpoints.

use std::fmt::Write;

use carousel_core::{CopyRequest, ProductBrief};

/// Sampling parameters for one kind of completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Presence penalty, if any.
    pub presence_penalty: Option<f32>,
    /// Frequency penalty, if any.
    pub frequency_penalty: Option<f32>,
}

/// Sampling for single-slide copy.
pub const CAROUSEL_TEXT_SAMPLING: Sampling = Sampling {
    temperature: 0.8,
    max_tokens: 100,
    presence_penalty: None,
    frequency_penalty: None,
};

/// Sampling for hook lists.
pub const HOOKS_SAMPLING: Sampling = Sampling {
    temperature: 0.9,
    max_tokens: 800,
    presence_penalty: Some(0.3),
    frequency_penalty: Some(0.3),
};

/// Hooks at or above this many characters are dropped.
pub const MAX_HOOK_CHARS: usize = 100;

/// System prompt for slide copy.
pub const CAROUSEL_TEXT_SYSTEM_PROMPT: &str = "You are an expert carousel content creator for social media platforms like TikTok and Instagram. You create concise, engaging text for carousel slides that tells a compelling story about products. Each slide should have brief, punchy text that works together to create a narrative flow.";

/// System prompt for hooks.
pub const HOOKS_SYSTEM_PROMPT: &str = "You are a world-class social media content strategist and viral hook expert. Your specialty is creating scroll-stopping hooks that generate millions of views on TikTok, Instagram Reels, and YouTube Shorts. You understand human psychology, emotion, and what makes people stop scrolling.

Your hooks have helped creators go from 0 to millions of followers. You know exactly how to trigger curiosity, create urgency, and tap into deep human desires and fears.";

const CAROUSEL_TEXT_RULES: &str = "CAROUSEL TEXT RULES:
1. Keep it EXTREMELY brief - maximum 8-12 words per slide
2. Use the slide number to determine the content:
   - Slide 1: Hook or problem statement
   - Slide 2-3: Build tension or explain the issue
   - Slide 4-5: Introduce the solution (the product)
   - Slide 6-7: Benefits or results
   - Slide 8+: Call to action or final thought

3. Make each slide text:
   - Stand alone but connect to the story
   - Create curiosity for the next slide
   - Use emotional or power words
   - Be conversational and relatable

4. Text formatting:
   - Use line breaks strategically for impact
   - Keep centered alignment in mind
   - Make it readable on mobile

5. Avoid:
   - Long sentences
   - Complex words
   - Too much punctuation
   - Being too salesy";

const HOOK_RULES: &str = "HOOK CREATION RULES:
1. MAXIMUM 8-12 words per hook (shorter = more viral)
2. Start with psychological triggers:
   - \"POV: You just discovered...\"
   - \"The reason you're still...\"
   - \"Nobody talks about how...\"
   - \"This is why 99% of people...\"
   - \"Stop doing X if you want Y\"
   - \"I was today years old when...\"
   - \"Warning: This will change how you...\"

3. Use these viral frameworks:
   - Controversy: Challenge common beliefs
   - Curiosity Gap: Tease but don't reveal
   - Pattern Interrupt: Say something unexpected
   - Fear/FOMO: What they're missing out on
   - Social Proof: \"Everyone is switching to...\"
   - Transformation: Before/after implications
   - Secret/Insider: \"What they don't tell you...\"

4. Power words to include:
   - Secretly, Actually, Literally, Honestly
   - Shocking, Insane, Crazy, Wild
   - Nobody, Everyone, Finally
   - Stop, Never, Always
   - Hack, Trick, Secret, Truth

5. Emotional triggers:
   - Make them feel smart for discovering this
   - Create urgency without being salesy
   - Tap into their biggest pain points
   - Promise transformation or revelation

6. Format variety:
   - Questions that hit different
   - Bold statements they can't ignore
   - Relatable scenarios (POV style)
   - Controversial takes
   - \"Hot takes\" that spark debate

ANALYZE the product deeply and create hooks that:
- Address the core problem it solves
- Highlight unique benefits competitors miss
- Create \"aha moments\"
- Make people feel they NEED this

Return ONLY the hooks, one per line. No numbers, no explanations. Make every single hook so compelling that NOT clicking would feel like a mistake.";

/// User prompt for one slide's copy.
#[must_use]
pub fn carousel_text_prompt(request: &CopyRequest) -> String {
    let product = &request.product;
    let mut prompt = format!(
        "Create a single piece of text for slide {} of a product carousel.\n\nPRODUCT DETAILS:\n",
        request.slide_number
    );
    write_product_basics(&mut prompt, product);
    push_optional(&mut prompt, "Value Proposition", product.value_proposition.as_deref());
    push_optional(&mut prompt, "Social Strategy", product.social_strategy.as_deref());

    if !request.existing_texts.is_empty() {
        prompt.push_str("\nEXISTING SLIDES TEXT:\n");
        for (i, text) in request.existing_texts.iter().enumerate() {
            let _ = writeln!(prompt, "Slide {}: {text}", i + 1);
        }
    }

    let _ = write!(
        prompt,
        "\n{CAROUSEL_TEXT_RULES}\n\nBased on the slide number and existing content, generate ONE piece of text for slide {}. Return ONLY the text, no explanations or slide numbers.",
        request.slide_number
    );
    prompt
}

/// User prompt for a list of hooks.
#[must_use]
pub fn hooks_prompt(product: &ProductBrief, count: usize) -> String {
    let mut prompt = format!(
        "Create {count} ULTRA-VIRAL hooks for this product. These hooks MUST make people stop scrolling immediately.\n\nPRODUCT DETAILS:\n"
    );
    write_product_basics(&mut prompt, product);
    if let Some(hooks) = product.example_hooks.as_deref() {
        let _ = writeln!(
            prompt,
            "Competitor Hooks for Reference:\n{}",
            json_list(hooks).join("\n")
        );
    }
    if let Some(tags) = product.example_hashtags.as_deref() {
        let _ = writeln!(prompt, "Trending Hashtags: {}", json_list(tags).join(" "));
    }
    let _ = write!(prompt, "\n{HOOK_RULES}");
    prompt
}

/// Extract hooks from a completion: one per line, trimmed, without blank
/// lines, numbered lines or lines of [`MAX_HOOK_CHARS`] characters or more,
/// at most `count` of them.
#[must_use]
pub fn parse_hooks(content: &str, count: usize) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_numbered(line))
        .filter(|line| line.chars().count() < MAX_HOOK_CHARS)
        .take(count)
        .map(str::to_string)
        .collect()
}

fn is_numbered(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && matches!(line[digits..].chars().next(), Some('.' | ')'))
}

fn write_product_basics(prompt: &mut String, product: &ProductBrief) {
    let _ = writeln!(prompt, "App Name: {}", product.app_name);
    let _ = writeln!(prompt, "Description: {}", product.short_description);
    push_optional(prompt, "Full Details", product.long_description.as_deref());
    push_optional(prompt, "Target Audience", product.target_audience.as_deref());
}

fn push_optional(prompt: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        let _ = writeln!(prompt, "{label}: {value}");
    }
}

/// Product records store reference hooks and hashtags as JSON string
/// arrays. Anything else is used verbatim as a single entry.
fn json_list(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| vec![raw.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ProductBrief {
        ProductBrief {
            long_description: Some("Tracks your skin over time".into()),
            example_hooks: Some(r#"["POV: your skin finally cleared","Nobody tells you this"]"#.into()),
            example_hashtags: Some(r##"["#skincare","#glowup"]"##.into()),
            ..ProductBrief::new("Glow", "Skin tracker")
        }
    }

    #[test]
    fn test_carousel_prompt_lists_existing_slides() {
        let request = CopyRequest {
            product: product(),
            slide_number: 3,
            existing_texts: vec!["First".into(), "Second".into()],
        };
        let prompt = carousel_text_prompt(&request);
        assert!(prompt.starts_with("Create a single piece of text for slide 3"));
        assert!(prompt.contains("App Name: Glow"));
        assert!(prompt.contains("Full Details: Tracks your skin over time"));
        assert!(!prompt.contains("Target Audience"));
        assert!(prompt.contains("Slide 1: First\nSlide 2: Second"));
        assert!(prompt.ends_with("no explanations or slide numbers."));
    }

    #[test]
    fn test_carousel_prompt_without_existing_slides() {
        let request = CopyRequest {
            product: ProductBrief::new("Glow", "Skin tracker"),
            slide_number: 1,
            existing_texts: Vec::new(),
        };
        assert!(!carousel_text_prompt(&request).contains("EXISTING SLIDES TEXT"));
    }

    #[test]
    fn test_hooks_prompt_expands_json_lists() {
        let prompt = hooks_prompt(&product(), 5);
        assert!(prompt.starts_with("Create 5 ULTRA-VIRAL hooks"));
        assert!(prompt.contains("POV: your skin finally cleared\nNobody tells you this"));
        assert!(prompt.contains("Trending Hashtags: #skincare #glowup"));
    }

    #[test]
    fn test_hooks_prompt_tolerates_plain_text_lists() {
        let brief = ProductBrief {
            example_hashtags: Some("#one #two".into()),
            ..ProductBrief::new("Glow", "Skin tracker")
        };
        assert!(hooks_prompt(&brief, 1).contains("Trending Hashtags: #one #two"));
    }

    #[test]
    fn test_parse_hooks_filters_lines() {
        let long = "x".repeat(100);
        let content = format!(
            "  Stop scrolling now  \n\n1. Numbered hook\n2) Also numbered\n{long}\nNobody talks about this\n2024 was wild\nThird"
        );
        let hooks = parse_hooks(&content, 10);
        assert_eq!(
            hooks,
            vec!["Stop scrolling now", "Nobody talks about this", "2024 was wild", "Third"]
        );
    }

    #[test]
    fn test_parse_hooks_truncates_to_count() {
        let hooks = parse_hooks("a\nb\nc\nd", 2);
        assert_eq!(hooks, vec!["a", "b"]);
    }
}
