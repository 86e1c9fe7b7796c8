//! Starter library used for a store that has never been persisted

use super::types::{Folder, Prompt, PromptVersion, StoreState, Tag};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

const CODE_REVIEW: &str = "You are an expert code reviewer. Please review the following code and provide:

1. **Code Quality Assessment**
   - Identify potential bugs, performance issues, and security vulnerabilities
   - Suggest improvements for readability and maintainability
   - Check for adherence to best practices and coding standards

2. **Specific Feedback**
   - Highlight specific lines or sections that need attention
   - Provide concrete suggestions for improvement
   - Explain the reasoning behind your recommendations

3. **Overall Rating**
   - Rate the code on a scale of 1-10
   - Provide a brief summary of the most critical issues

Please be constructive and specific in your feedback.";

const CREATIVE_WRITING: &str = "Generate creative writing prompts that are:

**Characteristics:**
- Unique and thought-provoking
- Suitable for various genres (fiction, poetry, creative non-fiction)
- Open-ended enough to inspire multiple interpretations
- Challenging but accessible

**Format:**
- Provide 5-10 prompts per request
- Include a mix of different styles and themes
- Add brief context or inspiration for each prompt
- Consider different skill levels (beginner to advanced)

**Themes to include:**
- Human relationships and emotions
- Nature and environment
- Technology and society
- Historical events or periods
- Fantasy and speculative elements";

const PRODUCTIVITY: &str = "You are a productivity expert. Help me design a personalized productivity system based on my needs and preferences.

**My Information:**
- [Describe your work style, goals, and current challenges]
- [Mention any existing tools or methods you use]
- [Specify your main productivity goals]

**Please provide:**
1. **System Overview**
   - A high-level framework that fits my needs
   - Key principles and methodologies to follow
   - Recommended tools and apps

2. **Daily Workflow**
   - Morning and evening routines
   - Task management approach
   - Time blocking strategies

3. **Implementation Plan**
   - Step-by-step setup process
   - Timeline for adoption
   - Metrics to track progress

4. **Customization Options**
   - How to adapt the system as needs change
   - Troubleshooting common issues
   - Integration with existing habits";

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn sample_prompt(
    id: &str,
    title: &str,
    content: &str,
    tags: &[&str],
    folder_id: &str,
    is_favorite: bool,
    created: DateTime<Utc>,
) -> Prompt {
    Prompt {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        folder_id: Some(folder_id.to_string()),
        is_favorite,
        created_at: created,
        updated_at: created,
        version: 1,
        history: vec![PromptVersion {
            id: id.to_string(),
            content: content.to_string(),
            timestamp: created,
            version: 1,
        }],
    }
}

/// Three folders, four tags and three prompts filed across them
pub fn sample_state() -> StoreState {
    let now = Utc::now();
    let folders = ["Work", "Personal", "Ideas"]
        .iter()
        .enumerate()
        .map(|(i, name)| Folder {
            id: (i + 1).to_string(),
            name: name.to_string(),
            color: None,
            created_at: now,
        })
        .collect();

    let tags = ["writing", "coding", "creative", "productivity"]
        .iter()
        .enumerate()
        .map(|(i, name)| Tag {
            id: (i + 1).to_string(),
            name: name.to_string(),
            color: None,
            created_at: now,
        })
        .collect();

    let prompts = vec![
        sample_prompt(
            "1",
            "Code Review Assistant",
            CODE_REVIEW,
            &["coding", "productivity"],
            "1",
            true,
            day(2024, 1, 15),
        ),
        sample_prompt(
            "2",
            "Creative Writing Prompts",
            CREATIVE_WRITING,
            &["writing", "creative"],
            "2",
            false,
            day(2024, 1, 10),
        ),
        sample_prompt(
            "3",
            "Productivity System Designer",
            PRODUCTIVITY,
            &["productivity"],
            "1",
            true,
            day(2024, 1, 5),
        ),
    ];

    StoreState {
        prompts: Arc::new(prompts),
        folders: Arc::new(folders),
        tags: Arc::new(tags),
        ..StoreState::default()
    }
}
