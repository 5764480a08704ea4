// Copyright (c) 2026 xmpp-pubsub-service contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two service discovery callbacks a publish-subscribe service
//! provides to a disco#info/disco#items responder.

use jid::{BareJid, Jid};
use xmpp_parsers::data_forms::{DataForm, DataFormType, Field, FieldType};
use xmpp_parsers::disco::{DiscoInfoResult, DiscoItemsResult, Feature, Identity, Item};
use xmpp_parsers::pubsub::NodeName;

use crate::backend::PubSubBackend;
use crate::error::PubSubError;
use crate::ns;
use crate::service::PubSubService;

impl<B, S> PubSubService<B, S>
where
    B: PubSubBackend,
{
    /// Identity and features of the service, or of one of its nodes.
    ///
    /// Without a node, this describes the service itself: the configured
    /// identity plus one `pubsub#<feature>` entry per advertised feature.
    /// With a node, the backend is consulted; an unknown node yields an
    /// empty result, and the caller decides how to report that.
    pub async fn get_disco_info(
        &self,
        _target: &Jid,
        requestor: &BareJid,
        node: Option<&str>,
    ) -> Result<DiscoInfoResult, PubSubError> {
        let Some(node) = node else {
            let mut features = vec![Feature::new(ns::DISCO_ITEMS)];
            features.extend(self.features.iter().map(|feature| Feature::new(feature.var())));
            return Ok(DiscoInfoResult {
                node: None,
                identities: vec![self.identity.clone()],
                features,
                extensions: vec![],
            });
        };

        let mut result = DiscoInfoResult {
            node: Some(String::from(node)),
            identities: vec![],
            features: vec![],
            extensions: vec![],
        };
        let info = self
            .backend
            .get_node_info(requestor.clone(), NodeName(node.into()))
            .await?;
        if let Some(info) = info {
            result.identities.push(Identity {
                category: String::from("pubsub"),
                type_: String::from(info.node_type.as_str()),
                lang: None,
                name: None,
            });
            if !info.meta_data.is_empty() {
                let mut fields = vec![Field {
                    label: Some(String::from("The type of node (collection or leaf)")),
                    ..Field::new("pubsub#node_type", FieldType::TextSingle)
                        .with_value(info.node_type.as_str())
                }];
                fields.extend(info.meta_data);
                result.extensions.push(DataForm::new(
                    DataFormType::Result_,
                    ns::PUBSUB_METADATA,
                    fields,
                ));
            }
        }
        Ok(result)
    }

    /// The nodes of this service, as disco#items references to `target`.
    ///
    /// Node-scoped queries and services configured to hide their nodes
    /// yield an empty list.
    pub async fn get_disco_items(
        &self,
        target: &Jid,
        requestor: &BareJid,
        node: Option<&str>,
    ) -> Result<DiscoItemsResult, PubSubError> {
        let mut result = DiscoItemsResult {
            node: node.map(String::from),
            items: vec![],
            rsm: None,
        };
        if node.is_some() || self.hide_nodes {
            return Ok(result);
        }

        let nodes = self.backend.get_nodes(requestor.clone()).await?;
        result.items = nodes
            .into_iter()
            .map(|node| Item {
                jid: target.clone(),
                node: Some(node.0),
                name: None,
            })
            .collect();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{NodeInfo, NodeType};
    use crate::feature::PubSubFeature;
    use crate::service::PubSubServiceBuilder;
    use futures::channel::mpsc::UnboundedSender;
    use minidom::Element;

    struct Directory;

    impl PubSubBackend for Directory {
        async fn get_node_info(
            &self,
            _requestor: BareJid,
            node: NodeName,
        ) -> Result<Option<NodeInfo>, PubSubError> {
            Ok(match node.0.as_str() {
                "plain" => Some(NodeInfo {
                    node_type: NodeType::Leaf,
                    meta_data: vec![],
                }),
                "described" => Some(NodeInfo {
                    node_type: NodeType::Leaf,
                    meta_data: vec![Field::new("pubsub#description", FieldType::TextSingle)
                        .with_value("Atom feed")],
                }),
                _ => None,
            })
        }

        async fn get_nodes(&self, _requestor: BareJid) -> Result<Vec<NodeName>, PubSubError> {
            Ok(vec![
                NodeName(String::from("blog")),
                NodeName(String::from("wishlist")),
            ])
        }
    }

    fn service(hide_nodes: bool) -> PubSubService<Directory, UnboundedSender<Element>> {
        let (stream, _inbox) = futures::channel::mpsc::unbounded();
        let builder = PubSubServiceBuilder::new(Directory, stream)
            .enable_feature(PubSubFeature::Publish)
            .enable_feature(PubSubFeature::RetrieveItems);
        let builder = if hide_nodes {
            builder.hide_nodes()
        } else {
            builder
        };
        builder.build()
    }

    fn target() -> Jid {
        Jid::new("pubsub.denmark.lit").unwrap()
    }

    fn requestor() -> BareJid {
        BareJid::new("hamlet@denmark.lit").unwrap()
    }

    #[tokio::test]
    async fn service_info() {
        let service = service(false);
        let info = service
            .get_disco_info(&target(), &requestor(), None)
            .await
            .unwrap();
        assert_eq!(info.identities.len(), 1);
        assert_eq!(info.identities[0].category, "pubsub");
        assert_eq!(info.identities[0].type_, "generic");
        assert_eq!(
            info.identities[0].name.as_deref(),
            Some("Generic Publish-Subscribe Service")
        );
        let vars: Vec<_> = info.features.iter().map(|f| f.var.as_str()).collect();
        assert_eq!(
            vars,
            vec![
                "http://jabber.org/protocol/disco#items",
                "http://jabber.org/protocol/pubsub#publish",
                "http://jabber.org/protocol/pubsub#retrieve-items",
            ]
        );
        assert!(info.extensions.is_empty());
    }

    #[tokio::test]
    async fn unknown_node_yields_empty_info() {
        let service = service(false);
        let info = service
            .get_disco_info(&target(), &requestor(), Some("missing"))
            .await
            .unwrap();
        assert!(info.identities.is_empty());
        assert!(info.features.is_empty());
        assert!(info.extensions.is_empty());
    }

    #[tokio::test]
    async fn node_info_without_meta_data() {
        let service = service(false);
        let info = service
            .get_disco_info(&target(), &requestor(), Some("plain"))
            .await
            .unwrap();
        assert_eq!(info.identities.len(), 1);
        assert_eq!(info.identities[0].type_, "leaf");
        assert!(info.extensions.is_empty());
    }

    #[tokio::test]
    async fn node_info_meta_data_form() {
        let service = service(false);
        let info = service
            .get_disco_info(&target(), &requestor(), Some("described"))
            .await
            .unwrap();
        assert_eq!(info.extensions.len(), 1);
        let form = &info.extensions[0];
        assert_eq!(form.type_, DataFormType::Result_);
        assert_eq!(
            form.form_type.as_deref(),
            Some("http://jabber.org/protocol/pubsub#meta-data")
        );
        assert_eq!(form.fields.len(), 2);
        assert_eq!(form.fields[0].var.as_deref(), Some("pubsub#node_type"));
        assert_eq!(form.fields[0].values, vec![String::from("leaf")]);
        assert_eq!(form.fields[1].var.as_deref(), Some("pubsub#description"));
    }

    #[tokio::test]
    async fn items_lists_nodes() {
        let service = service(false);
        let items = service
            .get_disco_items(&target(), &requestor(), None)
            .await
            .unwrap();
        assert_eq!(items.items.len(), 2);
        assert_eq!(items.items[0].jid, target());
        assert_eq!(items.items[0].node.as_deref(), Some("blog"));
        assert_eq!(items.items[1].node.as_deref(), Some("wishlist"));
    }

    #[tokio::test]
    async fn items_respects_hide_nodes() {
        let service = service(true);
        let items = service
            .get_disco_items(&target(), &requestor(), None)
            .await
            .unwrap();
        assert!(items.items.is_empty());
    }

    #[tokio::test]
    async fn node_scoped_items_are_empty() {
        let service = service(false);
        let items = service
            .get_disco_items(&target(), &requestor(), Some("blog"))
            .await
            .unwrap();
        assert!(items.items.is_empty());
        assert_eq!(items.node.as_deref(), Some("blog"));
    }
}
