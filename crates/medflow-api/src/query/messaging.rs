//! Messaging repository.
//!
//! Messaging is plain request/response: callers poll for new messages.

use std::future::Future;

use medflow_core::{ApiRequest, Result};
use serde_json::json;

use crate::ApiClient;
use crate::model::{
    ActionReply, Conversation, ConversationFilter, Message, NewConversation, NewMessage,
};

const CONVERSATIONS: &str = "/conversations/";
const MESSAGES: &str = "/messages/";

/// Repository for conversations and messages.
pub trait MessagingRepository {
    /// Lists the conversations the signed-in account takes part in.
    fn list_conversations(
        &self,
        filter: ConversationFilter,
    ) -> impl Future<Output = Result<Vec<Conversation>>> + Send;

    /// Finds a conversation by identifier.
    fn find_conversation(&self, id: i64) -> impl Future<Output = Result<Conversation>> + Send;

    /// Opens a conversation.
    fn create_conversation(
        &self,
        conversation: NewConversation,
    ) -> impl Future<Output = Result<Conversation>> + Send;

    /// Marks every message of a conversation as read.
    fn mark_conversation_read(&self, id: i64) -> impl Future<Output = Result<ActionReply>> + Send;

    /// Adds an account to a conversation.
    fn add_participant(
        &self,
        id: i64,
        user_id: i64,
    ) -> impl Future<Output = Result<ActionReply>> + Send;

    /// Removes an account from a conversation.
    fn remove_participant(
        &self,
        id: i64,
        user_id: i64,
    ) -> impl Future<Output = Result<ActionReply>> + Send;

    /// Deletes a conversation.
    fn delete_conversation(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Lists the messages of a conversation.
    fn list_messages(&self, conversation: i64) -> impl Future<Output = Result<Vec<Message>>> + Send;

    /// Posts a message.
    fn send_message(&self, message: NewMessage) -> impl Future<Output = Result<Message>> + Send;

    /// Marks a single message as read.
    fn mark_message_read(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Deletes a message.
    fn delete_message(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
}

impl MessagingRepository for ApiClient {
    async fn list_conversations(&self, filter: ConversationFilter) -> Result<Vec<Conversation>> {
        let request = filter
            .to_query()
            .into_iter()
            .fold(ApiRequest::get(CONVERSATIONS), |request, (name, value)| {
                request.with_query(name, value)
            });
        self.fetch_list(request).await
    }

    async fn find_conversation(&self, id: i64) -> Result<Conversation> {
        self.fetch(ApiRequest::get(format!("{CONVERSATIONS}{id}/")))
            .await
    }

    async fn create_conversation(&self, conversation: NewConversation) -> Result<Conversation> {
        self.fetch(ApiRequest::post(CONVERSATIONS).with_json(&conversation)?)
            .await
    }

    async fn mark_conversation_read(&self, id: i64) -> Result<ActionReply> {
        self.fetch(ApiRequest::post(format!("{CONVERSATIONS}{id}/mark_as_read/")))
            .await
    }

    async fn add_participant(&self, id: i64, user_id: i64) -> Result<ActionReply> {
        let request = ApiRequest::post(format!("{CONVERSATIONS}{id}/add_participant/"))
            .with_body(json!({ "user_id": user_id }));
        self.fetch(request).await
    }

    async fn remove_participant(&self, id: i64, user_id: i64) -> Result<ActionReply> {
        let request = ApiRequest::post(format!("{CONVERSATIONS}{id}/remove_participant/"))
            .with_body(json!({ "user_id": user_id }));
        self.fetch(request).await
    }

    async fn delete_conversation(&self, id: i64) -> Result<()> {
        self.perform(ApiRequest::delete(format!("{CONVERSATIONS}{id}/")))
            .await
    }

    async fn list_messages(&self, conversation: i64) -> Result<Vec<Message>> {
        let request = ApiRequest::get(MESSAGES).with_query("conversation", conversation);
        self.fetch_list(request).await
    }

    async fn send_message(&self, message: NewMessage) -> Result<Message> {
        self.fetch(ApiRequest::post(MESSAGES).with_json(&message)?)
            .await
    }

    async fn mark_message_read(&self, id: i64) -> Result<()> {
        self.perform(ApiRequest::post(format!("{MESSAGES}{id}/mark_as_read/")))
            .await
    }

    async fn delete_message(&self, id: i64) -> Result<()> {
        self.perform(ApiRequest::delete(format!("{MESSAGES}{id}/")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use medflow_core::Method;
    use medflow_core::mock::{MockReply, MockTransport};

    use super::*;
    use crate::client::tests::signed_in_client;

    #[tokio::test]
    async fn test_conversation_filters_become_query() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Get,
            CONVERSATIONS,
            MockReply::json(
                200,
                json!([{
                    "id": 9,
                    "subject": "Résultats",
                    "participants": [3, 7],
                    "participants_data": [
                        { "id": 3, "name": "Gregory House", "user_type": "doctor" },
                        { "id": 7, "name": "Alice Martin", "user_type": "patient" },
                    ],
                    "unread_count": 2,
                }]),
            ),
        );

        let filter = ConversationFilter {
            clinic: Some(2),
            ..ConversationFilter::default()
        };
        let conversations = client.list_conversations(filter).await.unwrap();

        assert_eq!(conversations[0].unread_count, 2);
        assert_eq!(conversations[0].participants_data.len(), 2);
        let sent = transport.requests_to(Method::Get, CONVERSATIONS);
        assert_eq!(sent[0].query, vec![("clinic".to_owned(), "2".to_owned())]);
    }

    #[tokio::test]
    async fn test_send_and_poll_messages() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Post,
            MESSAGES,
            MockReply::json(
                201,
                json!({ "id": 40, "conversation": 9, "sender": 3, "content": "Bonjour" }),
            ),
        );
        transport.push(
            Method::Get,
            MESSAGES,
            MockReply::json(
                200,
                json!({ "results": [{ "id": 40, "conversation": 9, "content": "Bonjour" }] }),
            ),
        );

        let sent = client
            .send_message(NewMessage {
                conversation: 9,
                content: "Bonjour".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(sent.id, 40);

        let messages = client.list_messages(9).await.unwrap();
        assert_eq!(messages.len(), 1);

        let polls = transport.requests_to(Method::Get, MESSAGES);
        assert_eq!(polls[0].query, vec![("conversation".to_owned(), "9".to_owned())]);
    }

    #[tokio::test]
    async fn test_add_participant_body() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Post,
            "/conversations/9/add_participant/",
            MockReply::json(200, json!({ "message": "Alice Martin a été ajouté" })),
        );

        let reply = client.add_participant(9, 7).await.unwrap();
        assert!(reply.message.is_some());
        let body = transport.requests_to(Method::Post, "/conversations/9/add_participant/")[0]
            .body
            .clone()
            .unwrap();
        assert_eq!(body, json!({ "user_id": 7 }));
    }
}
