//! A self-contained publish-subscribe service over an in-memory store.
//!
//! There is no real XMPP connection here: a few canned component stanzas
//! are pushed through the dispatcher and the responses are read back from
//! the outbound channel, which is where a component stream would sit.

use std::collections::BTreeMap;
use std::sync::Mutex;

use futures::channel::mpsc;
use futures::StreamExt;
use jid::BareJid;
use minidom::Element;
use xmpp_parsers::pubsub::{ItemId, NodeName, Subscription};
use xmpp_pubsub_service::{PubSubBackend, PubSubError, PubSubFeature, PubSubServiceBuilder};

#[derive(Default)]
struct MemoryBackend {
    nodes: Mutex<BTreeMap<String, Vec<Element>>>,
    counter: Mutex<u32>,
}

impl PubSubBackend for MemoryBackend {
    async fn create(
        &self,
        _requestor: BareJid,
        node: Option<NodeName>,
    ) -> Result<NodeName, PubSubError> {
        let name = match node {
            Some(node) => node.0,
            None => {
                let mut counter = self.counter.lock().unwrap();
                *counter += 1;
                format!("generated/{}", counter)
            }
        };
        self.nodes.lock().unwrap().entry(name.clone()).or_default();
        Ok(NodeName(name))
    }

    async fn publish(
        &self,
        _requestor: BareJid,
        node: NodeName,
        items: Vec<Element>,
    ) -> Result<(), PubSubError> {
        match self.nodes.lock().unwrap().get_mut(&node.0) {
            Some(stored) => {
                stored.extend(items);
                Ok(())
            }
            None => Err(PubSubError::BadRequest),
        }
    }

    async fn subscribe(
        &self,
        _requestor: BareJid,
        node: NodeName,
        _subscriber: jid::Jid,
    ) -> Result<(NodeName, Subscription), PubSubError> {
        Ok((node, Subscription::Subscribed))
    }

    async fn items(
        &self,
        _requestor: BareJid,
        node: NodeName,
        max_items: Option<u32>,
        _item_ids: Vec<ItemId>,
    ) -> Result<Vec<Element>, PubSubError> {
        let nodes = self.nodes.lock().unwrap();
        let stored = nodes.get(&node.0).cloned().unwrap_or_default();
        let limit = max_items.map(|max| max as usize).unwrap_or(stored.len());
        Ok(stored.into_iter().take(limit).collect())
    }

    async fn get_nodes(&self, _requestor: BareJid) -> Result<Vec<NodeName>, PubSubError> {
        Ok(self
            .nodes
            .lock()
            .unwrap()
            .keys()
            .cloned()
            .map(NodeName)
            .collect())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let (stream, mut inbox) = mpsc::unbounded();
    let mut service = PubSubServiceBuilder::new(MemoryBackend::default(), stream)
        .set_identity("pubsub", "service", "In-memory publish-subscribe")
        .enable_feature(PubSubFeature::CreateNodes)
        .enable_feature(PubSubFeature::Publish)
        .enable_feature(PubSubFeature::Subscribe)
        .enable_feature(PubSubFeature::RetrieveItems)
        .build();

    let stanzas = [
        "<iq xmlns='jabber:component:accept' type='set' id='1' from='hamlet@denmark.lit/castle' to='pubsub.denmark.lit'><pubsub xmlns='http://jabber.org/protocol/pubsub'><create node='princely_musings'/></pubsub></iq>",
        "<iq xmlns='jabber:component:accept' type='set' id='2' from='hamlet@denmark.lit/castle' to='pubsub.denmark.lit'><pubsub xmlns='http://jabber.org/protocol/pubsub'><publish node='princely_musings'><item id='current'><entry xmlns='urn:example:blog'>To be, or not to be.</entry></item></publish></pubsub></iq>",
        "<iq xmlns='jabber:component:accept' type='set' id='3' from='francisco@denmark.lit/barracks' to='pubsub.denmark.lit'><pubsub xmlns='http://jabber.org/protocol/pubsub'><subscribe node='princely_musings' jid='francisco@denmark.lit'/></pubsub></iq>",
        "<iq xmlns='jabber:component:accept' type='get' id='4' from='francisco@denmark.lit/barracks' to='pubsub.denmark.lit'><pubsub xmlns='http://jabber.org/protocol/pubsub'><items node='princely_musings'/></pubsub></iq>",
        // Not implemented by this backend: answered with
        // feature-not-implemented instead of a result.
        "<iq xmlns='jabber:component:accept' type='set' id='5' from='hamlet@denmark.lit/castle' to='pubsub.denmark.lit'><pubsub xmlns='http://jabber.org/protocol/pubsub#owner'><delete node='princely_musings'/></pubsub></iq>",
    ];

    for stanza in stanzas {
        let iq: Element = stanza.parse().unwrap();
        println!("=> {:?}", iq);
        if service.handle_iq(&iq).await {
            println!("<= {:?}", inbox.next().await.unwrap());
        } else {
            println!("   (not a publish-subscribe request)");
        }
        println!();
    }
}
