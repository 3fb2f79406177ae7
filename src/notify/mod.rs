pub mod engine;

use anyhow::Result;

/// One desktop notification to deliver. `subtitle` and `url` are folded into
/// the body on platforms without native support for them.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub subtitle: Option<String>,
    pub url: Option<String>,
}

/// Fire-and-forget delivery seam. The engine swallows delivery errors, so an
/// implementation only needs to make a best effort.
pub trait Notifier {
    fn notify(&self, request: &NotificationRequest) -> Result<()>;
}

/// Delivers through the OS notification facility.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, request: &NotificationRequest) -> Result<()> {
        let mut body = String::new();
        if let Some(subtitle) = &request.subtitle {
            body.push_str(subtitle);
            body.push('\n');
        }
        body.push_str(&request.body);
        if let Some(url) = &request.url {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(url);
        }

        notify_rust::Notification::new()
            .appname("prr")
            .summary(&request.title)
            .body(&body)
            .show()?;
        Ok(())
    }
}
