use plugin_contract::{
    default_config, PluginInfo, SendOutcome, KEY_ASSET_NAME, KEY_CONNECT_TIMEOUT_MS,
    KEY_PROXY_HOST, KEY_PROXY_PORT, KEY_SUBSCRIPTION_SETTLE_MS, KEY_TOPIC,
};

#[test]
fn default_config_lists_mandatory_items() {
    let config = default_config();
    for key in [KEY_PROXY_HOST, KEY_PROXY_PORT, KEY_SUBSCRIPTION_SETTLE_MS, KEY_TOPIC, KEY_ASSET_NAME] {
        let item = config.get(key).expect("item");
        assert!(item.is_mandatory(), "{key} should be mandatory");
    }
    assert!(!config[KEY_CONNECT_TIMEOUT_MS].is_mandatory());
    assert!(!config[KEY_SUBSCRIPTION_SETTLE_MS].is_mandatory());
    assert_eq!(config[KEY_SUBSCRIPTION_SETTLE_MS].default, "100");
    assert_eq!(config[KEY_PROXY_PORT].default, "5559");
    assert_eq!(config[KEY_PROXY_PORT].item_type, "integer");
    assert_eq!(config[KEY_ASSET_NAME].default, "zmq-");
}

#[test]
fn plugin_info_serializes_host_shape() {
    let info = serde_json::to_value(PluginInfo::north()).expect("encode");
    assert_eq!(info["name"], "ZMQ Publisher");
    assert_eq!(info["type"], "north");
    assert_eq!(info["mode"], "async");
    assert_eq!(info["interface"], "1.0");
    assert_eq!(info["config"]["proxyHost"]["displayName"], "ZMQ proxy host");
    assert_eq!(info["config"]["plugin"]["readonly"], "true");
    assert!(info["config"]["proxyHost"].get("value").is_none());
}

#[test]
fn send_outcome_tuples() {
    assert_eq!(SendOutcome::sent(7, 3).as_tuple(), (true, 7, 3));
    assert_eq!(SendOutcome::failed(5).as_tuple(), (false, 5, 0));
}
