//! Prompt text sent to the model.

/// System instruction sent ahead of every prompt.
pub const SYSTEM_PROMPT: &str = "You are a script writer for a YouTube channel that makes one minute videos about random topics. You are given a title of a post from a random subreddit. You must research the post and write a complete and concise one minute YouTube video about the post. In the style of a VSauce video without ever referring to the narrator. Imagine you're explaining to someone who has never heard of it before, but never refer to the post as a post. If it's applicable, show the historical context and the cultural and social impact of the post.";

/// Narrative prompt for a scraped tech article.
///
/// `paragraph` is expected to be truncated already.
pub fn tech_article(title: &str, paragraph: &str) -> String {
    format!(
        "Please rewrite the following article as a complete one minute YouTube video. Keep the summary as concise as possible, but make it engaging and interesting, in the style of a VSauce video without ever referring to the narrator. If necessary, provide your own examples. Here is the title: {title}. I'm feeding you the entire webpage's paragraph elements, so ignore any random or unrelated information: {paragraph}"
    )
}

/// Narrative prompt for a subreddit post title.
pub fn history_post(subreddit: &str, title: &str) -> String {
    format!(
        "I'm going to give you a title of a post from the r/{subreddit} history subreddit. Thoroughly research the post and write a complete and concise one minute YouTube video about the post. In the style of a VSauce video without ever referring to the narrator. Imagine you're explaining to someone who has never heard of it before, but never refer to the post as a post. If it's applicable, show the historical context and the cultural and social impact of the post. Here is the title: {title}."
    )
}
