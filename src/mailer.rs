use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    transport::smtp::authentication::Credentials,
};

use crate::config::SmtpConfig;

const REMINDER_SUBJECT: &str = "Renew your KejaHunt monthly listing license";
const REMINDER_BODY: &str = "Dear Landlord,\n\n\
    Your monthly listing license is about to expire. Please pay your listing \
    fee to continue posting properties on KejaHunt. If you've already paid, \
    you can ignore this message!\n\n\
    Thank you for using KejaHunt.";

/// SMTP mailer built once at startup. Building the transport does not
/// connect; failures surface on send.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    pub async fn send_license_reminder(&self, to: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject(REMINDER_SUBJECT)
            .body(REMINDER_BODY.to_string())?;
        self.transport.send(message).await?;
        Ok(())
    }
}
