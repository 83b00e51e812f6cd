// Instruction prompt sent with every image
// Author: kelexine (https://github.com/kelexine)

/// Bumped whenever [`ANALYSIS_PROMPT`] changes, since the formatter's field
/// markers depend on its wording.
pub const PROMPT_VERSION: u32 = 1;

/// Asks for the four-field template that [`super::formatter`] recognizes.
pub const ANALYSIS_PROMPT: &str = "Analyze this image and provide:
1. Identify ALL fruits visible in the image (list each fruit type)
2. For each fruit, determine if it is FRESH or ROTTEN
3. Provide a confidence score (0-100%) for your analysis
4. Provide a brief quality assessment for each fruit

Format your response exactly like this:
Fruits Found: [list fruits]
Status: [FRESH or ROTTEN for each]
Confidence: [0-100%]
Quality: [brief assessment]

Be specific about fruit types (e.g., Apple, Banana, Orange, etc.)";
