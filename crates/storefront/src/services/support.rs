//! Customer support: the FAQ, the contact chat, and return requests.
//!
//! Messages and return requests reach the support team through
//! [`SupportBackend`]. [`MockSupportBackend`] answers every message with
//! [`AUTO_REPLY`] after a delay and files return requests in memory.

use core::fmt;
use core::str::FromStr;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use voltshop_core::TicketId;

use crate::error::add_breadcrumb;

/// Canned answer sent to every contact message.
pub const AUTO_REPLY: &str =
    "Recebemos sua mensagem! Em breve um de nossos atendentes entrará em contato.";

/// Shown once a return request has been filed.
pub const RETURN_CONFIRMATION: &str =
    "Solicitação coletada, logo entraremos em contato para prosseguirmos com o pedido";

/// Latency of the storefront's canned reply.
pub const AUTO_REPLY_DELAY: Duration = Duration::from_secs(1);

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Errors from the support pages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupportError {
    /// The contact message was blank.
    #[error("message cannot be blank")]
    EmptyMessage,

    /// A return request field was missing or malformed.
    #[error("invalid return request: {0}")]
    InvalidRequest(String),

    /// The support backend failed.
    #[error("support backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Frequently asked questions, in display order.
pub const FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "Como posso rastrear meu pedido?",
        answer: "Você receberá um código de rastreamento por e-mail assim que o pedido for enviado.",
    },
    FaqEntry {
        question: "Qual o prazo de entrega?",
        answer: "O prazo de entrega varia de 7 a 15 dias úteis, dependendo da sua região.",
    },
    FaqEntry {
        question: "Como solicitar reembolso?",
        answer: "Entre em contato com o suporte informando o número do pedido e o motivo da solicitação.",
    },
    FaqEntry {
        question: "Quais formas de pagamento são aceitas?",
        answer: "Aceitamos cartões de crédito, PIX e boleto bancário.",
    },
    FaqEntry {
        question: "Os produtos têm garantia?",
        answer: "Sim. O prazo de garantia varia de acordo com o fabricante de cada produto.",
    },
];

/// Why a customer wants to return an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnReason {
    WrongItem,
    Damaged,
    SizeMismatch,
    NotAsDescribed,
    ChangedMind,
    Other,
}

impl ReturnReason {
    /// Every reason, in the order the form lists them.
    pub const ALL: [Self; 6] = [
        Self::WrongItem,
        Self::Damaged,
        Self::SizeMismatch,
        Self::NotAsDescribed,
        Self::ChangedMind,
        Self::Other,
    ];

    /// Label shown in the reason picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WrongItem => "Pedido veio errado",
            Self::Damaged => "Pedido veio quebrado ou danificado",
            Self::SizeMismatch => "Tamanho não corresponde ao anunciado",
            Self::NotAsDescribed => "Produto diferente do anunciado",
            Self::ChangedMind => "Arrependimento da compra",
            Self::Other => "Outro motivo",
        }
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::WrongItem => "wrong_item",
            Self::Damaged => "damaged",
            Self::SizeMismatch => "size_mismatch",
            Self::NotAsDescribed => "not_as_described",
            Self::ChangedMind => "changed_mind",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ReturnReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReturnReason {
    type Err = SupportError;

    /// Accepts a slug (`"damaged"`) or a label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|reason| {
                reason.slug().eq_ignore_ascii_case(s)
                    || reason.label().to_lowercase() == s.to_lowercase()
            })
            .ok_or_else(|| SupportError::InvalidRequest(format!("unknown return reason: {s}")))
    }
}

/// A validated return request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnRequest {
    reason: ReturnReason,
    description: String,
    image_ref: Option<String>,
}

impl ReturnRequest {
    /// Build a request from form input. A blank `image_ref` counts as no image.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::InvalidRequest` if the description is blank or
    /// the image is not a JPEG, PNG, WebP, or GIF file.
    pub fn new(
        reason: ReturnReason,
        description: &str,
        image_ref: Option<&str>,
    ) -> Result<Self, SupportError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(SupportError::InvalidRequest(
                "describe the problem with the order".to_string(),
            ));
        }

        let image_ref = image_ref.map(str::trim).filter(|s| !s.is_empty());
        if let Some(image) = image_ref.filter(|image| !is_image(image)) {
            return Err(SupportError::InvalidRequest(format!(
                "{image} is not an image file"
            )));
        }

        Ok(Self {
            reason,
            description: description.to_owned(),
            image_ref: image_ref.map(str::to_owned),
        })
    }

    #[must_use]
    pub const fn reason(&self) -> ReturnReason {
        self.reason
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }
}

fn is_image(path: &str) -> bool {
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    })
}

/// A filed return request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnTicket {
    pub id: TicketId,
    pub request: ReturnRequest,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Customer,
    Support,
}

/// One line of the contact chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Remote support operations.
pub trait SupportBackend: Send + Sync {
    /// Deliver a contact message and return the support team's answer.
    fn reply(&self, message: &str) -> impl Future<Output = Result<String, SupportError>> + Send;

    /// File a return request.
    fn submit_return(
        &self,
        request: &ReturnRequest,
    ) -> impl Future<Output = Result<TicketId, SupportError>> + Send;
}

impl<T: SupportBackend> SupportBackend for Arc<T> {
    fn reply(&self, message: &str) -> impl Future<Output = Result<String, SupportError>> + Send {
        (**self).reply(message)
    }

    fn submit_return(
        &self,
        request: &ReturnRequest,
    ) -> impl Future<Output = Result<TicketId, SupportError>> + Send {
        (**self).submit_return(request)
    }
}

/// In-memory support desk.
#[derive(Default)]
pub struct MockSupportBackend {
    returns: Mutex<Vec<(TicketId, ReturnRequest)>>,
    delay: Duration,
    offline: AtomicBool,
}

impl fmt::Debug for MockSupportBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSupportBackend")
            .field("delay", &self.delay)
            .field("offline", &self.offline.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl MockSupportBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated latency applied to every call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// While offline, every call fails with `SupportError::Backend`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Return requests filed so far, oldest first.
    #[must_use]
    pub fn filed_returns(&self) -> Vec<(TicketId, ReturnRequest)> {
        self.returns
            .lock()
            .map(|returns| returns.clone())
            .unwrap_or_default()
    }

    async fn round_trip(&self) -> Result<(), SupportError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.offline.load(Ordering::Relaxed) {
            return Err(SupportError::Backend("support desk unavailable".to_string()));
        }
        Ok(())
    }
}

impl SupportBackend for MockSupportBackend {
    async fn reply(&self, _message: &str) -> Result<String, SupportError> {
        self.round_trip().await?;
        Ok(AUTO_REPLY.to_string())
    }

    async fn submit_return(&self, request: &ReturnRequest) -> Result<TicketId, SupportError> {
        self.round_trip().await?;

        let id = TicketId::generate();
        self.returns
            .lock()
            .map_err(|e| SupportError::Backend(e.to_string()))?
            .push((id.clone(), request.clone()));
        Ok(id)
    }
}

/// The support pages: FAQ, contact chat, and returns.
pub struct SupportService<B> {
    backend: B,
    transcript: Vec<ChatMessage>,
}

impl<B: SupportBackend> SupportService<B> {
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            transcript: Vec::new(),
        }
    }

    #[must_use]
    pub const fn faq(&self) -> &'static [FaqEntry] {
        FAQ
    }

    /// The chat so far, oldest first.
    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Send a contact message and wait for the answer. Both end up in the
    /// transcript; a failed call leaves the transcript untouched.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::EmptyMessage` for a blank message, plus any
    /// backend error.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn send_message(&mut self, text: &str) -> Result<ChatMessage, SupportError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SupportError::EmptyMessage);
        }

        let question = ChatMessage::new(Sender::Customer, text);
        let answer = self.backend.reply(text).await?;
        let answer = ChatMessage::new(Sender::Support, answer);

        add_breadcrumb("support", "send_message", None);
        tracing::info!(messages = self.transcript.len() + 2, "Support message answered");

        self.transcript.push(question);
        self.transcript.push(answer.clone());
        Ok(answer)
    }

    /// File a return request.
    ///
    /// # Errors
    ///
    /// Returns any backend error.
    #[instrument(skip(self, request), fields(reason = request.reason().slug()))]
    pub async fn request_return(&self, request: ReturnRequest) -> Result<ReturnTicket, SupportError> {
        let id = self.backend.submit_return(&request).await?;

        add_breadcrumb("support", "request_return", Some(&[("ticket_id", id.as_str())]));
        tracing::info!(ticket_id = %id, "Return request filed");

        Ok(ReturnTicket {
            id,
            request,
            submitted_at: Utc::now(),
        })
    }
}
