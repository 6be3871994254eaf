use crate::schema::HostConfig;

pub(super) fn validate_content(errors: &mut Vec<String>, config: &HostConfig) {
    if let Some(url) = &config.content.url {
        if url.trim().is_empty() {
            errors.push("content.url must not be empty".into());
        }
    }

    for (i, script) in config.content.init_scripts.iter().enumerate() {
        if script.trim().is_empty() {
            errors.push(format!("content.init_scripts[{i}] is empty"));
        }
    }
}
