//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册 / 登录
//! - [`categories`] - 分类管理接口
//! - [`products`] - 商品管理接口
//! - [`cart`] - 购物车接口
//! - [`addresses`] - 收货地址接口
//! - [`orders`] - 订单接口 (结账、状态流转、支付凭证)
//! - [`reviews`] - 评价接口
//! - [`testimonials`] - 精选评价 (店面展示)

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod testimonials;
