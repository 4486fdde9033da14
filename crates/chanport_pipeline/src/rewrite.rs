use std::collections::HashMap;

use chanport_contract::{Embed, Message};

/// Produces the reposted body: the original content and a deep-copied
/// embed list with every mapped source URL literally substituted in every
/// text-bearing field. URLs absent from the map stay untouched, which is
/// how transfer failures and non-file URLs survive unharmed. The original
/// message is never mutated.
pub fn rewrite_message(
    message: &Message,
    url_map: &HashMap<String, String>,
) -> (String, Vec<Embed>) {
    let content = substitute(&message.content, url_map);
    let embeds = message
        .embeds
        .iter()
        .map(|embed| rewrite_embed(embed, url_map))
        .collect();
    (content, embeds)
}

fn rewrite_embed(embed: &Embed, url_map: &HashMap<String, String>) -> Embed {
    let mut rewritten = embed.clone();
    rewritten.image_url = rewritten.image_url.map(|url| substitute(&url, url_map));
    rewritten.thumbnail_url = rewritten.thumbnail_url.map(|url| substitute(&url, url_map));
    rewritten.video_url = rewritten.video_url.map(|url| substitute(&url, url_map));
    rewritten.description = rewritten.description.map(|text| substitute(&text, url_map));
    for field in &mut rewritten.fields {
        field.value = substitute(&field.value, url_map);
    }
    rewritten
}

fn substitute(text: &str, url_map: &HashMap<String, String>) -> String {
    let mut output = text.to_string();
    for (source, destination) in url_map {
        if output.contains(source.as_str()) {
            output = output.replace(source.as_str(), destination);
        }
    }
    output
}
