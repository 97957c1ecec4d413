mod common;

use common::{BUYER, SELLER, is_cached, market_with_users};

fn pair() -> Vec<String> {
    vec![SELLER.to_string(), BUYER.to_string()]
}

#[tokio::test]
async fn add_chat_finds_or_creates() {
    let market = market_with_users().await;

    let chat = market.add_chat(pair()).await.unwrap();
    let again = market
        .add_chat(vec![BUYER.to_string(), SELLER.to_string()])
        .await
        .unwrap();
    assert_eq!(chat.id, again.id);

    let found = market.chat_by_participants(&pair()).await.unwrap();
    assert_eq!(found.map(|c| c.id), Some(chat.id.clone()));
    assert!(!is_cached(&market, &format!("chat:{}", chat.id)).await);
}

#[tokio::test]
async fn messages_are_appended() {
    let market = market_with_users().await;
    let chat = market.add_chat(pair()).await.unwrap();

    let message = market
        .add_message(chat.id.as_str(), BUYER, "Still available?")
        .await
        .unwrap();
    assert_eq!(message.sender, BUYER);

    let chat = market.chat_by_id(chat.id.as_str()).await.unwrap();
    assert_eq!(chat.messages, vec![message]);
}

#[tokio::test]
async fn missing_chat_is_not_found() {
    let market = market_with_users().await;
    let err = market
        .add_message("0191e0a4c8e07b6a9d3f2c1b0a998879", BUYER, "hello")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(market.chat_by_participants(&pair()).await.unwrap().is_none());
}

#[tokio::test]
async fn empty_participants_rejected() {
    let market = market_with_users().await;
    assert!(market.add_chat(Vec::new()).await.unwrap_err().is_validation_error());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_messages_are_all_kept() {
    let market = market_with_users().await;
    let chat = market.add_chat(pair()).await.unwrap();

    let sends: Vec<_> = (0..200)
        .map(|i| {
            let market = market.clone();
            let chat_id = chat.id.clone();
            tokio::spawn(async move {
                market
                    .add_message(chat_id.as_str(), BUYER, &format!("offer {i}"))
                    .await
            })
        })
        .collect();
    for send in sends {
        send.await.unwrap().unwrap();
    }

    let chat = market.chat_by_id(chat.id.as_str()).await.unwrap();
    assert_eq!(chat.messages.len(), 200);
}
