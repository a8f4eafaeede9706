//! Prompt construction for the generation backend

use std::collections::HashMap;

use crate::agent::classify::TaskCategory;

const CHANGES_FORMAT: &str = r#"
Based on the instruction and the code provided, generate the necessary changes.
Your response should be structured as follows:

For each file that needs modifications:

FILE: <file_path>
```
<entire new file content>
```

Explain your changes briefly after each file.

Remember:
1. Only include files that need modifications
2. Always provide the ENTIRE new file content, not just the changes
3. Include sensible code comments where appropriate
4. Ensure the code is correct, idiomatic, and follows best practices
"#;

const EXPLANATION_FORMAT: &str = r#"
Based on the instruction and the code provided, provide a detailed explanation.
Focus on clarity, accuracy, and providing insights that would be helpful to the user.
"#;

/// Prompt asking the model for structured file changes.
pub fn code_generation_prompt(
    category: TaskCategory,
    instruction: &str,
    files: &HashMap<String, String>,
) -> String {
    let mut prompt = format!(
        "You are DeepCoder, an expert AI coding assistant that helps modify code based on user instructions.\n\n\
         TASK TYPE: {}\n\n\
         INSTRUCTION: {}\n\n\
         RELEVANT FILES:\n",
        category.as_str(),
        instruction
    );
    push_file_sections(&mut prompt, files);
    prompt.push_str(CHANGES_FORMAT);
    prompt
}

/// Prompt asking the model for a free-form explanation.
pub fn explanation_prompt(instruction: &str, files: &HashMap<String, String>) -> String {
    let mut prompt = format!(
        "You are DeepCoder, an expert AI coding assistant that helps explain code.\n\n\
         INSTRUCTION: {}\n\n\
         RELEVANT FILES:\n",
        instruction
    );
    push_file_sections(&mut prompt, files);
    prompt.push_str(EXPLANATION_FORMAT);
    prompt
}

/// Append one `--- path ---` section per file, in sorted path order so
/// identical context always produces the identical prompt.
fn push_file_sections(prompt: &mut String, files: &HashMap<String, String>) {
    let mut paths: Vec<&String> = files.keys().collect();
    paths.sort();

    for path in paths {
        prompt.push_str(&format!("\n--- {} ---\n{}\n", path, files[path]));
    }
}
