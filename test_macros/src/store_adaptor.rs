use proc_macro2::TokenStream;
use quote::quote;

pub fn expand_store_tests(factory: TokenStream) -> TokenStream {
    quote! {
        #[cfg(test)]
        mod store_adaptor_tests {
            use super::*;
            use futures::future::join_all;
            use claimq_traits::{ItemCounts, NewItem, QueueName, StoreAdaptor, Token};

            #[tokio::test]
            async fn can_insert_items() {
                let store=#factory;
                let queue=queue_name();
                let first=store.insert(item(&queue,"a")).await.unwrap();
                let second=store.insert(item(&queue,"b")).await.unwrap();
                assert!(second>first);
                let stored=store.find_item(first).await.unwrap().unwrap();
                assert_eq!(stored.item_id,first);
                assert_eq!(stored.queue_name,queue);
                assert_eq!(stored.data,b"a".to_vec());
                assert!(!stored.processed);
                assert!(stored.token.is_none());
                assert_eq!(store.count(&queue).await.unwrap(),ItemCounts{unclaimed:2,claimed:0,processed:0});
            }

            #[tokio::test]
            async fn can_claim_oldest_item_first() {
                let store=#factory;
                let queue=queue_name();
                let first=store.insert(item(&queue,"a")).await.unwrap();
                let second=store.insert(item(&queue,"b")).await.unwrap();
                let token1=token();
                if let Some(claimed)=store.claim(&queue,&token1).await.unwrap(){
                    assert_eq!(claimed.item_id,first);
                    assert_eq!(claimed.data,b"a".to_vec());
                    assert_eq!(claimed.token.as_ref(),Some(&token1));
                    assert!(!claimed.processed);
                }else{
                    panic!("oldest item not claimed");
                }
                if let Some(claimed)=store.claim(&queue,&token()).await.unwrap(){
                    assert_eq!(claimed.item_id,second);
                }else{
                    panic!("second item not claimed");
                }
                assert!(store.claim(&queue,&token()).await.unwrap().is_none());
                assert_eq!(store.count(&queue).await.unwrap(),ItemCounts{unclaimed:0,claimed:2,processed:0});
            }

            #[tokio::test]
            async fn claim_on_empty_queue_updates_nothing() {
                let store=#factory;
                let queue=queue_name();
                assert_eq!(store.claim_oldest(&queue,&token()).await.unwrap(),0);
                assert!(store.claim(&queue,&token()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn claims_are_scoped_to_one_queue() {
                let store=#factory;
                let queue=queue_name();
                let other=queue_name();
                let id=store.insert(item(&queue,"a")).await.unwrap();
                assert!(store.claim(&other,&token()).await.unwrap().is_none());
                assert_eq!(store.claim(&queue,&token()).await.unwrap().map(|v|v.item_id),Some(id));
            }

            #[tokio::test]
            async fn claimed_item_is_found_only_by_its_token() {
                let store=#factory;
                let queue=queue_name();
                let id=store.insert(item(&queue,"a")).await.unwrap();
                let token1=token();
                assert_eq!(store.claim_oldest(&queue,&token1).await.unwrap(),1);
                assert!(store.find_claimed(&queue,&token()).await.unwrap().is_none());
                assert!(store.find_claimed(&queue_name(),&token1).await.unwrap().is_none());
                let found=store.find_claimed(&queue,&token1).await.unwrap().unwrap();
                assert_eq!(found.item_id,id);
                assert_eq!(store.claim_oldest(&queue,&token()).await.unwrap(),0);
            }

            #[tokio::test]
            async fn processed_items_keep_their_token_and_are_not_claimed_again() {
                let store=#factory;
                let queue=queue_name();
                store.insert(item(&queue,"a")).await.unwrap();
                let token1=token();
                let claimed=store.claim(&queue,&token1).await.unwrap().unwrap();
                store.mark_processed(claimed.item_id).await.unwrap();
                assert!(store.find_claimed(&queue,&token1).await.unwrap().is_none());
                let stored=store.find_item(claimed.item_id).await.unwrap().unwrap();
                assert!(stored.processed);
                assert_eq!(stored.token,Some(token1));
                assert!(stored.updated_at>=claimed.updated_at);
                assert!(store.claim(&queue,&token()).await.unwrap().is_none());
                assert_eq!(store.count(&queue).await.unwrap(),ItemCounts{unclaimed:0,claimed:0,processed:1});
            }

            #[tokio::test]
            async fn mark_processed_fails_for_unknown_items() {
                let store=#factory;
                assert!(store.mark_processed(i64::MAX).await.is_err());
            }

            #[tokio::test]
            async fn mark_processed_fails_for_unclaimed_items() {
                let store=#factory;
                let queue=queue_name();
                let id=store.insert(item(&queue,"a")).await.unwrap();
                assert!(store.mark_processed(id).await.is_err());
                let stored=store.find_item(id).await.unwrap().unwrap();
                assert!(!stored.processed);
                assert!(stored.is_claimable());
                assert_eq!(store.count(&queue).await.unwrap(),ItemCounts{unclaimed:1,claimed:0,processed:0});
            }

            #[tokio::test]
            async fn can_delete_old_processed_items() {
                let store=#factory;
                let queue=queue_name();
                let first=store.insert(item(&queue,"a")).await.unwrap();
                let second=store.insert(item(&queue,"b")).await.unwrap();
                let third=store.insert(item(&queue,"c")).await.unwrap();
                let claimed=store.claim(&queue,&token()).await.unwrap().unwrap();
                assert_eq!(claimed.item_id,first);
                store.mark_processed(first).await.unwrap();
                assert!(store.claim(&queue,&token()).await.unwrap().is_some());
                assert_eq!(store.delete_processed(now()-chrono::Duration::hours(1)).await.unwrap(),0);
                assert!(store.find_item(first).await.unwrap().is_some());
                assert_eq!(store.delete_processed(now()+chrono::Duration::minutes(1)).await.unwrap(),1);
                assert!(store.find_item(first).await.unwrap().is_none());
                assert!(store.find_item(second).await.unwrap().is_some());
                assert!(store.find_item(third).await.unwrap().is_some());
                assert_eq!(store.delete_processed(now()+chrono::Duration::minutes(1)).await.unwrap(),0);
                assert_eq!(store.count(&queue).await.unwrap(),ItemCounts{unclaimed:1,claimed:1,processed:0});
            }

            #[tokio::test]
            async fn can_release_stale_claims() {
                let store=#factory;
                let queue=queue_name();
                let first=store.insert(item(&queue,"a")).await.unwrap();
                let second=store.insert(item(&queue,"b")).await.unwrap();
                store.claim(&queue,&token()).await.unwrap().unwrap();
                let token2=token();
                store.claim(&queue,&token2).await.unwrap().unwrap();
                store.mark_processed(second).await.unwrap();
                assert_eq!(store.release_claims(now()-chrono::Duration::hours(1)).await.unwrap(),0);
                assert!(store.find_item(first).await.unwrap().unwrap().is_claimed());
                assert_eq!(store.release_claims(now()+chrono::Duration::minutes(1)).await.unwrap(),1);
                assert!(store.find_item(first).await.unwrap().unwrap().is_claimable());
                let processed=store.find_item(second).await.unwrap().unwrap();
                assert!(processed.processed);
                assert_eq!(processed.token,Some(token2));
                if let Some(claimed)=store.claim(&queue,&token()).await.unwrap(){
                    assert_eq!(claimed.item_id,first);
                }else{
                    panic!("released item not claimed again");
                }
            }

            #[tokio::test]
            async fn concurrent_claims_are_exclusive() {
                let store=#factory;
                let queue=queue_name();
                for data in ["a","b","c"]{
                    store.insert(item(&queue,data)).await.unwrap();
                }
                let claims=join_all((0..10).map(|_|{
                    let store=store.clone();
                    let queue=queue.clone();
                    async move{store.claim(&queue,&token()).await.unwrap()}
                })).await;
                let mut ids:Vec<_>=claims.iter().flatten().map(|v|v.item_id).collect();
                assert_eq!(ids.len(),3);
                ids.sort();
                ids.dedup();
                assert_eq!(ids.len(),3);
                assert_eq!(claims.iter().filter(|v|v.is_none()).count(),7);
            }

            fn queue_name()->QueueName{
                QueueName::new(format!("queue-{}",uuid::Uuid::new_v4()))
            }

            fn token()->Token{
                Token::new(uuid::Uuid::new_v4().simple().to_string())
            }

            fn item(queue:&QueueName,data:&str)->NewItem{
                NewItem::new(queue.clone(),data.as_bytes().to_vec())
            }

            fn now()->chrono::NaiveDateTime{
                chrono::Utc::now().naive_utc()
            }
        }
    }
}
