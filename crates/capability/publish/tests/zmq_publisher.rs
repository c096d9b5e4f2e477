use domain::{DatapointValue, OutputRecord};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use zeromq::{Endpoint, Socket, SocketRecv, SubSocket};
use zmq_north_publish::{BatchPublisher, NoopPublisher, ZmqPublisher, ZmqPublisherConfig};

fn publisher(port: u16, connect_timeout_ms: u64) -> ZmqPublisher {
    ZmqPublisher::new(ZmqPublisherConfig {
        host: "127.0.0.1".to_string(),
        port,
        connect_timeout_ms,
        subscription_settle_ms: 100,
    })
}

async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("addr").port()
}

#[tokio::test]
async fn noop_publisher_accepts_everything() {
    let result = NoopPublisher.publish("topic", b"[]".to_vec()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn unreachable_proxy_is_a_transport_error() {
    let port = unused_port().await;
    let result = publisher(port, 300).publish("DEFAULT", b"[]".to_vec()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn publisher_opens_zmtp_connection_to_proxy() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();

    // 对端只读取问候而不回应，握手因此超时。
    let proxy = async {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut signature = [0u8; 10];
        stream.read_exact(&mut signature).await.expect("greeting");
        (stream, signature)
    };
    let zmq = publisher(port, 500);
    let (result, (_stream, signature)) = tokio::join!(
        zmq.publish("DEFAULT", b"[]".to_vec()),
        proxy
    );

    assert_eq!(signature[0], 0xFF);
    assert_eq!(signature[9], 0x7F);
    assert!(result.is_err());
}

fn sample_records() -> Vec<OutputRecord> {
    let content = BTreeMap::from([("x".to_string(), DatapointValue::F64(1.5))]);
    vec![OutputRecord {
        asset: "A".to_string(),
        timestamp: "2020-03-05 10:20:30.000000+00:00".to_string(),
        content: content.clone(),
        readings: Some(content),
    }]
}

#[tokio::test]
async fn subscriber_receives_topic_and_batch() {
    let mut subscriber = SubSocket::new();
    let endpoint = subscriber.bind("tcp://127.0.0.1:0").await.expect("bind");
    let port = match endpoint {
        Endpoint::Tcp(_, port) => port,
        other => panic!("unexpected endpoint {other}"),
    };
    subscriber.subscribe("").await.expect("subscribe");

    let records = sample_records();
    let payload = serde_json::to_vec(&records).expect("encode");
    let zmq = publisher(port, 2000);

    for _ in 0..3 {
        zmq
            .publish("DEFAULT", payload.clone())
            .await
            .expect("publish");
        let message = tokio::time::timeout(Duration::from_secs(2), subscriber.recv())
            .await
            .expect("delivered")
            .expect("recv");

        assert_eq!(message.len(), 2);
        assert_eq!(message.get(0).expect("topic frame").as_ref(), b"DEFAULT");
        let decoded: Vec<OutputRecord> =
            serde_json::from_slice(message.get(1).expect("payload frame")).expect("decode");
        assert_eq!(decoded, records);
    }
}
