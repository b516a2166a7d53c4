use crate::ai::types::ChatMessage;

const REACTION_SYSTEM: &str =
    "You are an expert chemistry tutor. Always respond with valid JSON only.";

const TUTOR_SYSTEM: &str = "You are an expert chemistry tutor for high school students. \
                            Provide clear, engaging explanations.";

const ASSISTANT_SYSTEM: &str = "You are an expert chemistry tutor for high school students. \
You give clear, accurate and educational explanations of chemistry concepts, reactions, \
equations, laboratory safety and real-world applications.

Guidelines:
1. Use simple, clear language appropriate for high school level
2. Explain problems step by step
3. Include real-world examples and applications
4. Emphasize safety when relevant
5. Use proper chemical notation and formulas
6. Break complex concepts into understandable parts
7. For flowcharts use a plain text format with arrows (→) and numbered steps
8. When balancing equations, show every balancing step
9. Be encouraging and supportive
10. Avoid unnecessary asterisks, hashtags or heavy markdown; prefer clean paragraphs and bullet points

Format answers with clear structure and spacing so they are easy to read.";

/// Prompt asking whether the given elements form a real, stable compound.
/// `elements` are display labels such as "Na (Sodium)".
pub fn reaction_analysis(elements: &[String]) -> Vec<ChatMessage> {
    let elements = elements.join(", ");
    let prompt = format!(
        r#"You are a chemistry expert analyzing a potential reaction between the elements: {elements}.

Decide whether these elements can realistically form a stable compound and provide educational information about it.

Respond with JSON in exactly this format:
{{
  "product": "Chemical formula (e.g. H₂O, NaCl, CO₂)",
  "productName": "Common name of the compound",
  "description": "Brief scientific description of the compound and the reaction",
  "uses": "Real-world applications and uses",
  "facts": "Interesting educational facts about the compound",
  "feasible": true or false
}}

Rules:
1. Only suggest stable compounds that actually exist
2. If the elements cannot form a stable compound, set "feasible" to false and explain why in "description"
3. Use proper chemical notation with subscripts and superscripts
4. Keep descriptions educational and appropriate for high school students
5. Stay with real chemistry, not science fiction
6. For infeasible combinations still explain what makes them unreactive

Examples:
- H + O → H₂O (water)
- Na + Cl → NaCl (table salt)
- C + O → CO₂ (carbon dioxide)
- Noble gases typically do not react with other elements"#
    );
    vec![ChatMessage::system(REACTION_SYSTEM), ChatMessage::user(prompt)]
}

pub fn element_explanation(symbol: &str, name: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(TUTOR_SYSTEM),
        ChatMessage::user(format!(
            "Give a brief, educational explanation of the element {name} ({symbol}) that high \
             school students would find interesting. Include 2-3 fascinating facts in about \
             100 words."
        )),
    ]
}

pub fn assistant_chat(question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(ASSISTANT_SYSTEM),
        ChatMessage::user(question.trim()),
    ]
}
